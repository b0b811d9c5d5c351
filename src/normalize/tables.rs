//! Provider status vocabularies and their canonical mapping.
//!
//! Every table is total: codes outside the documented vocabulary resolve
//! to [`TradeStatus::Waiting`] so the caller queries again instead of
//! trusting an unknown state.

use crate::model::trade::TradeStatus;

/// `trade_status` values returned by the code family and notifications.
pub const TRADE_STATUS_CODES: &[&str] = &[
    "WAIT_BUYER_PAY",
    "TRADE_CLOSED",
    "TRADE_SUCCESS",
    "TRADE_PART_REFUND",
    "TRADE_ALL_REFUND",
    "TRADE_PROCESS",
    "TRADE_FAILD",
];

/// `trade_status_ext` value that forces [`TradeStatus::UserPaying`].
pub const TRADE_STATUS_EXT_USERPAYING: &str = "TRADE_USERPAYING";

/// `refund_state` values returned by refund queries.
pub const REFUND_STATE_CODES: &[&str] = &[
    "in_process",
    "success",
    "fail_due_manual_close",
    "fail_to_manual_deal",
    "fail",
];

/// `data.status` values of the ret family:
/// 0 paying, 1 paid, 2 failed, 3 revoked, 4 revoking,
/// 5 fully refunded, 6 partly refunded, 7 refunding.
pub const NUMERIC_STATUS_CODES: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7"];

/// Failure sub-codes meaning "outcome not known yet".
pub const TRANSIENT_SUB_CODES: &[&str] = &["3161", "3155", "3172"];

/// Query failure sub-code for an order the gateway never saw.
pub const QUERY_NO_RESULT: &str = "ACQ.QUERY_NO_RESULT";

pub fn trade_status(code: &str) -> TradeStatus {
    match code {
        "WAIT_BUYER_PAY" => TradeStatus::UserPaying,
        "TRADE_CLOSED" => TradeStatus::Closed,
        "TRADE_SUCCESS" | "TRADE_PART_REFUND" | "TRADE_ALL_REFUND" => TradeStatus::Success,
        "TRADE_PROCESS" => TradeStatus::Waiting,
        "TRADE_FAILD" => TradeStatus::Closed,
        _ => TradeStatus::Waiting,
    }
}

pub fn refund_state(code: &str) -> TradeStatus {
    match code {
        "in_process" => TradeStatus::Waiting,
        "success" => TradeStatus::Success,
        "fail_due_manual_close" => TradeStatus::Waiting,
        "fail_to_manual_deal" | "fail" => TradeStatus::Closed,
        _ => TradeStatus::Waiting,
    }
}

/// Numeric status of a payment.
pub fn numeric_trade_status(code: &str) -> TradeStatus {
    match code {
        "0" => TradeStatus::UserPaying,
        "1" | "5" | "6" => TradeStatus::Success,
        "2" | "3" => TradeStatus::Closed,
        "4" | "7" => TradeStatus::Waiting,
        _ => TradeStatus::Waiting,
    }
}

/// Numeric status read from the refund's point of view.
pub fn numeric_refund_status(code: &str) -> TradeStatus {
    match code {
        "5" | "6" => TradeStatus::Success,
        "2" | "3" => TradeStatus::Closed,
        "7" => TradeStatus::Waiting,
        _ => TradeStatus::Waiting,
    }
}

pub fn is_transient_sub_code(sub_code: &str) -> bool {
    TRANSIENT_SUB_CODES.contains(&sub_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNKNOWN: &[&str] = &["", "TRADE_WEIRD", "success ", "SUCCESS", "11", "-1", "8"];

    #[test]
    fn test_trade_status_vocabulary() {
        let expected = [
            TradeStatus::UserPaying,
            TradeStatus::Closed,
            TradeStatus::Success,
            TradeStatus::Success,
            TradeStatus::Success,
            TradeStatus::Waiting,
            TradeStatus::Closed,
        ];
        for (code, status) in TRADE_STATUS_CODES.iter().zip(expected) {
            assert_eq!(trade_status(code), status, "{code}");
        }
    }

    #[test]
    fn test_refund_state_vocabulary() {
        let expected = [
            TradeStatus::Waiting,
            TradeStatus::Success,
            TradeStatus::Waiting,
            TradeStatus::Closed,
            TradeStatus::Closed,
        ];
        for (code, status) in REFUND_STATE_CODES.iter().zip(expected) {
            assert_eq!(refund_state(code), status, "{code}");
        }
    }

    #[test]
    fn test_numeric_vocabularies() {
        assert_eq!(numeric_trade_status("0"), TradeStatus::UserPaying);
        assert_eq!(numeric_trade_status("1"), TradeStatus::Success);
        assert_eq!(numeric_trade_status("3"), TradeStatus::Closed);
        assert_eq!(numeric_trade_status("7"), TradeStatus::Waiting);
        assert_eq!(numeric_refund_status("0"), TradeStatus::Waiting);
        assert_eq!(numeric_refund_status("1"), TradeStatus::Waiting);
        assert_eq!(numeric_refund_status("5"), TradeStatus::Success);
        assert_eq!(numeric_refund_status("2"), TradeStatus::Closed);
        let refund_successes = NUMERIC_STATUS_CODES
            .iter()
            .filter(|code| numeric_refund_status(code) == TradeStatus::Success)
            .count();
        assert_eq!(refund_successes, 2);
    }

    #[test]
    fn test_unknown_codes_are_waiting_everywhere() {
        let tables: [fn(&str) -> TradeStatus; 4] = [
            trade_status,
            refund_state,
            numeric_trade_status,
            numeric_refund_status,
        ];
        for table in tables {
            for code in UNKNOWN {
                assert_eq!(table(code), TradeStatus::Waiting, "{code}");
            }
        }
    }

    #[test]
    fn test_transient_sub_codes() {
        assert!(is_transient_sub_code("3161"));
        assert!(is_transient_sub_code("3172"));
        assert!(!is_transient_sub_code("40004"));
        assert!(!is_transient_sub_code(QUERY_NO_RESULT));
    }
}
