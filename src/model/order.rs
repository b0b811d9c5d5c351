use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub out_trade_no: String,
    /// Creation time of the order; the gateway indexes orders by shop date.
    pub created_at: DateTime<FixedOffset>,
}
