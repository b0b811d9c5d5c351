//! Normalizers for the `ret`-keyed response family and its flat
//! `retcode`/`return_code` relatives.

use super::tables;
use super::{amount, fill_time_end, fill_trade_amounts, new_result};
use crate::model::response::DecodedResponse;
use crate::model::trade::{ReturnCode, TradeResult, TradeStatus};

/// The `data` envelope of a `{ret, msg, data}` body.
const DATA: &str = "data";

/// `return_code` of a QR code request for an order that no longer accepts payment.
const QR_CODE_CLOSED: &str = "400019";

/// Some endpoints answer `ret: 0`, others `retcode: SUCCESS`.
fn ret_ok(decoded: &DecodedResponse) -> bool {
    decoded.text("ret").as_deref() == Some("0")
        || decoded.text("retcode").as_deref() == Some("SUCCESS")
}

fn data_status(data: &DecodedResponse, table: fn(&str) -> TradeStatus) -> TradeStatus {
    data.text("status")
        .map(|s| table(&s))
        .unwrap_or(TradeStatus::Waiting)
}

/// Payment or payment query.
pub fn trade(decoded: &DecodedResponse) -> TradeResult {
    if !ret_ok(decoded) {
        return new_result(decoded, ReturnCode::Fail);
    }
    let data = decoded.envelope(DATA).unwrap_or_default();
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(data_status(&data, tables::numeric_trade_status));
    fill_trade_amounts(&mut result, &data);
    result.out_trade_no = data.text("out_trade_no");
    result.bank_trade_no = data.text("trade_no");
    fill_time_end(&mut result, &data);
    result.wechat_open_id = data.text("openid");
    result
}

/// Refund or refund query.
pub fn refund(decoded: &DecodedResponse) -> TradeResult {
    if !ret_ok(decoded) {
        return new_result(decoded, ReturnCode::Fail);
    }
    let data = decoded.envelope(DATA).unwrap_or_default();
    let mut result = new_result(decoded, ReturnCode::Success);
    result.status = Some(data_status(&data, tables::numeric_refund_status));
    result.refund_fee = amount(&data, "refund_amount");
    result.out_trade_no = data.text("out_trade_no");
    result.out_refund_no = data.text("out_request_no");
    result.bank_trade_no = data.text("refundsn");
    fill_time_end(&mut result, &data);
    result
}

pub fn qr_code(decoded: &DecodedResponse) -> TradeResult {
    match decoded.text("return_code").as_deref() {
        Some("0") => {
            let mut result = new_result(decoded, ReturnCode::Success);
            result.qr_code = decoded.text("qrcode");
            result
        }
        code => {
            let mut result = new_result(decoded, ReturnCode::Fail);
            if code == Some(QR_CODE_CLOSED) {
                result.status = Some(TradeStatus::Closed);
            }
            result
        }
    }
}

pub fn open_id(decoded: &DecodedResponse) -> TradeResult {
    if decoded.text("retcode").as_deref() != Some("SUCCESS") {
        return new_result(decoded, ReturnCode::Fail);
    }
    let mut result = new_result(decoded, ReturnCode::Success);
    result.wechat_open_id = decoded.text("acct");
    result
}
