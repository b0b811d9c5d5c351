//! Normalizers for the `code`-keyed response family.
//!
//! Success is `code == "10000"`; failures carry `sub_code`/`sub_msg`.

use serde_json::Value;
use tracing::warn;

use super::tables::{self, QUERY_NO_RESULT, TRADE_STATUS_EXT_USERPAYING};
use super::{amount, fill_time_end, fill_trade_amounts, new_result};
use crate::model::response::DecodedResponse;
use crate::model::trade::{ReturnCode, TradeResult, TradeStatus};

pub const SUCCESS_CODE: &str = "10000";

fn is_success(decoded: &DecodedResponse) -> bool {
    decoded.text("code").as_deref() == Some(SUCCESS_CODE)
}

/// `trade_status` through the table, then the `trade_status_ext` override.
fn trade_status(decoded: &DecodedResponse) -> TradeStatus {
    let status = decoded
        .text("trade_status")
        .map(|s| tables::trade_status(&s))
        .unwrap_or(TradeStatus::Waiting);
    if decoded.text("trade_status_ext").as_deref() == Some(TRADE_STATUS_EXT_USERPAYING) {
        TradeStatus::UserPaying
    } else {
        status
    }
}

/// Failure result: transient sub-codes become `WAITING`, everything else
/// leaves the status undetermined.
fn failure(decoded: &DecodedResponse) -> TradeResult {
    let mut result = new_result(decoded, ReturnCode::Fail);
    if decoded
        .text("sub_code")
        .is_some_and(|c| tables::is_transient_sub_code(&c))
    {
        result.status = Some(TradeStatus::Waiting);
    }
    result
}

fn trade_success(decoded: &DecodedResponse) -> TradeResult {
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(trade_status(decoded));
    fill_trade_amounts(&mut result, decoded);
    result.bank_trade_no = decoded.text("trade_no");
    result.out_trade_no = decoded.text("out_trade_no");
    fill_time_end(&mut result, decoded);
    result.wechat_open_id = decoded.text("openid");
    result
}

/// Barcode payment.
pub fn pay(decoded: &DecodedResponse) -> TradeResult {
    if is_success(decoded) {
        trade_success(decoded)
    } else {
        failure(decoded)
    }
}

pub fn query(decoded: &DecodedResponse) -> TradeResult {
    if is_success(decoded) {
        return trade_success(decoded);
    }
    let mut result = failure(decoded);
    if decoded.text("sub_code").as_deref() == Some(QUERY_NO_RESULT) {
        result.status = Some(TradeStatus::Closed);
    }
    result
}

/// A refund request is only accepted here; its outcome comes from a
/// refund query.
pub fn refund(decoded: &DecodedResponse) -> TradeResult {
    if !is_success(decoded) {
        return failure(decoded);
    }
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(TradeStatus::Waiting);
    result.refund_fee = amount(decoded, "refund_amount");
    result.bank_trade_no = decoded.text("refundsn");
    result.out_refund_no = decoded.text("out_request_no");
    result.out_trade_no = decoded.text("out_trade_no");
    fill_time_end(&mut result, decoded);
    result
}

pub fn refund_query(decoded: &DecodedResponse) -> TradeResult {
    if !is_success(decoded) {
        return failure(decoded);
    }
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(
        decoded
            .text("refund_state")
            .map(|s| tables::refund_state(&s))
            .unwrap_or(TradeStatus::Waiting),
    );
    result.refund_fee = amount(decoded, "refund_amount");
    result.out_refund_no = decoded.text("out_request_no");
    result.out_trade_no = decoded.text("out_trade_no");
    fill_time_end(&mut result, decoded);
    result
}

/// WeChat and Alipay JS-API prepay.
pub fn jsapi(decoded: &DecodedResponse) -> TradeResult {
    if !is_success(decoded) {
        return failure(decoded);
    }
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(match decoded.text("trade_status").as_deref() {
        Some("WAIT_BUYER_PAY") => TradeStatus::UserPaying,
        _ => TradeStatus::Waiting,
    });
    result.total_fee = amount(decoded, "total_amount");
    result.bank_trade_no = decoded.text("trade_no");
    result.out_trade_no = decoded.text("out_trade_no");

    if let Some(pay_info) = decoded.text("jsapi_pay_info") {
        match serde_json::from_str::<Value>(&pay_info) {
            Ok(Value::Object(info)) => {
                result.prepay_id = info.get("tradeNO").and_then(Value::as_str).map(String::from);
                if info.contains_key("appId") {
                    result.wechat_package = Some(pay_info.clone());
                }
            }
            Ok(_) | Err(_) => warn!("jsapi_pay_info is not a JSON object"),
        }
    }
    result
}

/// Asynchronous payment notification, already signature-checked.
///
/// Notifications have no success discriminant, so `return_code` is always
/// `SUCCESS`.
pub fn notify(decoded: &DecodedResponse) -> TradeResult {
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(trade_status(decoded));
    fill_trade_amounts(&mut result, decoded);
    result.out_trade_no = decoded.text("out_trade_no");
    result.bank_trade_no = decoded.text("trade_no");
    result.trade_no = decoded.text("channel_recv_sn");
    fill_time_end(&mut result, decoded);
    result.wechat_open_id = decoded.text("openid");
    result.alipay_user_id = decoded.text("buyer_user_id");
    result
}
