use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RefundRequest {
    pub out_trade_no: String,
    pub out_refund_no: String,
    /// Minor currency units.
    pub refund_fee: i64,
    #[serde(default)]
    pub reason: Option<String>,
    /// Creation time of the order being refunded.
    pub order_created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefundQueryRequest {
    pub out_trade_no: String,
    pub out_refund_no: String,
}
