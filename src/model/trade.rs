use serde::Serialize;
use serde_json::Value;

/// Channel identifier stamped on every result.
pub const CHANNEL: &str = "vipspt";

/// Canonical trade status shared by all payment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// System busy or result pending; query again later.
    Waiting,
    /// Waiting for the payer to confirm.
    UserPaying,
    Success,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnCode {
    Success,
    Fail,
}

/// The canonical output of every operation.
///
/// `status: None` means the outcome is not determined and must never be
/// read as success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeResult {
    pub return_code: ReturnCode,
    pub return_msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TradeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_pay_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_trade_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_refund_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wechat_open_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alipay_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepay_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wechat_package: Option<String>,
    pub channel: &'static str,
    pub content: Value,
}

impl TradeResult {
    pub fn new(return_code: ReturnCode, content: Value) -> Self {
        Self {
            return_code,
            return_msg: String::new(),
            status: None,
            total_fee: None,
            buyer_pay_fee: None,
            refund_fee: None,
            out_trade_no: None,
            bank_trade_no: None,
            trade_no: None,
            out_refund_no: None,
            time_end: None,
            wechat_open_id: None,
            alipay_user_id: None,
            qr_code: None,
            prepay_id: None,
            wechat_package: None,
            channel: CHANNEL,
            content,
        }
    }

    pub fn is_success(&self) -> bool {
        self.return_code == ReturnCode::Success
    }
}
