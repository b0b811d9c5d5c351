//! Table-driven mapping of gateway responses onto [`TradeResult`].

pub mod code;
pub mod ret;
pub mod tables;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::amount::json_to_minor_units;
use crate::error::VipsptError;
use crate::model::params::Operation;
use crate::model::response::DecodedResponse;
use crate::model::trade::{ReturnCode, TradeResult};

/// Turns one endpoint family's decoded body into a [`TradeResult`].
pub trait Normalizer: Send + Sync {
    fn normalize(&self, decoded: &DecodedResponse) -> TradeResult;
}

impl<F> Normalizer for F
where
    F: Fn(&DecodedResponse) -> TradeResult + Send + Sync,
{
    fn normalize(&self, decoded: &DecodedResponse) -> TradeResult {
        self(decoded)
    }
}

/// The two body families the gateway answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    /// `{code, msg, sub_code?, sub_msg?, ...fields}`
    Code,
    /// `{ret, msg, data: {...}}`, or the flat `retcode`/`return_code` variants.
    Ret,
}

impl ResponseShape {
    pub fn detect(decoded: &DecodedResponse) -> Self {
        if decoded.contains("code") {
            ResponseShape::Code
        } else if ["ret", "retcode", "return_code"]
            .iter()
            .any(|key| decoded.contains(key))
        {
            ResponseShape::Ret
        } else {
            ResponseShape::Code
        }
    }

    /// The family an operation is documented to answer with.
    pub fn primary(operation: Operation) -> Self {
        match operation {
            Operation::QrCode | Operation::OpenId => ResponseShape::Ret,
            Operation::Pay
            | Operation::Query
            | Operation::Refund
            | Operation::RefundQuery
            | Operation::WeixinJsApi
            | Operation::AlipayJsApi
            | Operation::Notify => ResponseShape::Code,
        }
    }
}

/// Normalizers keyed by operation and response shape.
#[derive(Clone)]
pub struct NormalizerTable {
    entries: HashMap<(Operation, ResponseShape), Arc<dyn Normalizer>>,
}

impl NormalizerTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with(
        mut self,
        operation: Operation,
        shape: ResponseShape,
        normalizer: impl Normalizer + 'static,
    ) -> Self {
        self.entries.insert((operation, shape), Arc::new(normalizer));
        self
    }

    pub fn get(&self, operation: Operation, shape: ResponseShape) -> Option<&dyn Normalizer> {
        self.entries.get(&(operation, shape)).map(|n| n.as_ref())
    }

    /// Normalize `decoded` with the entry for its detected shape, falling
    /// back to the operation's primary shape.
    pub fn normalize(
        &self,
        operation: Operation,
        decoded: &DecodedResponse,
    ) -> Result<TradeResult, VipsptError> {
        let shape = ResponseShape::detect(decoded);
        let normalizer = self
            .get(operation, shape)
            .or_else(|| self.get(operation, ResponseShape::primary(operation)))
            .ok_or_else(|| {
                VipsptError::UnsupportedOperation(format!("no normalizer for {operation}"))
            })?;
        debug!(%operation, ?shape, "normalizing response");
        Ok(normalizer.normalize(decoded))
    }
}

impl Default for NormalizerTable {
    fn default() -> Self {
        use ResponseShape::{Code, Ret};

        Self::empty()
            .with(Operation::Pay, Code, code::pay)
            .with(Operation::Pay, Ret, ret::trade)
            .with(Operation::Query, Code, code::query)
            .with(Operation::Query, Ret, ret::trade)
            .with(Operation::Refund, Code, code::refund)
            .with(Operation::Refund, Ret, ret::refund)
            .with(Operation::RefundQuery, Code, code::refund_query)
            .with(Operation::RefundQuery, Ret, ret::refund)
            .with(Operation::WeixinJsApi, Code, code::jsapi)
            .with(Operation::AlipayJsApi, Code, code::jsapi)
            .with(Operation::QrCode, Ret, ret::qr_code)
            .with(Operation::OpenId, Ret, ret::open_id)
            .with(Operation::Notify, Code, code::notify)
    }
}

// ---- shared field helpers ----

pub(crate) fn new_result(decoded: &DecodedResponse, return_code: ReturnCode) -> TradeResult {
    let mut result = TradeResult::new(return_code, decoded.clone().into_value());
    result.return_msg = return_msg(decoded);
    result
}

/// `msg`, overridden by the more specific `sub_msg` or `errmsg`.
pub(crate) fn return_msg(decoded: &DecodedResponse) -> String {
    ["sub_msg", "errmsg", "msg"]
        .iter()
        .find_map(|key| decoded.text(key))
        .unwrap_or_default()
}

/// Strip date/time separators: `2022-09-09 11:37:08` → `20220909113708`.
pub(crate) fn compact_time(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | ' '))
        .collect()
}

pub(crate) fn amount(decoded: &DecodedResponse, key: &str) -> Option<i64> {
    decoded.get(key).and_then(json_to_minor_units)
}

/// `total_amount` and `settlement_amount`, the latter defaulting to the former.
pub(crate) fn fill_trade_amounts(result: &mut TradeResult, decoded: &DecodedResponse) {
    result.total_fee = amount(decoded, "total_amount");
    result.buyer_pay_fee = amount(decoded, "settlement_amount").or(result.total_fee);
}

pub(crate) fn fill_time_end(result: &mut TradeResult, decoded: &DecodedResponse) {
    result.time_end = decoded.text("account_date").map(|t| compact_time(&t));
}
