//! Conversion between the gateway's major-unit decimal amounts and the
//! integer minor units carried by [`TradeResult`](crate::model::trade::TradeResult).

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

const MINOR_PER_MAJOR: i64 = 100;

/// Parse a major-unit amount such as `"123.45"` into minor units (`12345`).
///
/// Exact decimal arithmetic; digits beyond the second decimal place are
/// truncated toward zero. Returns `None` for anything that is not a number
/// or does not fit in `i64` minor units.
pub fn to_minor_units(amount: &str) -> Option<i64> {
    let amount = amount.trim();
    let value = Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .ok()?;
    value
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))?
        .trunc()
        .to_i64()
}

/// [`to_minor_units`] for a JSON field that may be a string or a number.
pub fn json_to_minor_units(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => to_minor_units(s),
        Value::Number(n) => to_minor_units(&n.to_string()),
        _ => None,
    }
}

/// Minor units to the major-unit decimal sent to the gateway (`1` → `0.01`).
///
/// Trailing zeros are dropped (`100` → `1`, `1230` → `12.3`); the gateway
/// signs the amount in that form.
pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_exact_two_decimal_inputs() {
        assert_eq!(to_minor_units("0.01"), Some(1));
        assert_eq!(to_minor_units("123.45"), Some(12345));
        assert_eq!(to_minor_units("0.29"), Some(29));
        assert_eq!(to_minor_units("1.15"), Some(115));
        assert_eq!(to_minor_units("99999999.99"), Some(9_999_999_999));
    }

    #[test]
    fn test_no_drift_over_cent_grid() {
        // Values like 0.07, 0.29, 0.57 drift when routed through f64.
        for cents in 0..=100_000i64 {
            let text = format!("{}.{:02}", cents / 100, cents % 100);
            assert_eq!(to_minor_units(&text), Some(cents), "input {text}");
        }
    }

    #[test]
    fn test_integer_and_single_decimal() {
        assert_eq!(to_minor_units("10"), Some(1000));
        assert_eq!(to_minor_units("0.5"), Some(50));
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(to_minor_units("0.019"), Some(1));
        assert_eq!(to_minor_units("-0.019"), Some(-1));
    }

    #[test]
    fn test_invalid_amounts() {
        assert_eq!(to_minor_units(""), None);
        assert_eq!(to_minor_units("abc"), None);
        assert_eq!(to_minor_units("1,00"), None);
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(to_minor_units("999999999999999999999999999"), None);
        assert_eq!(to_minor_units("79228162514264337593543950335"), None);
        assert_eq!(to_minor_units("1e30"), None);
        // fits in Decimal but not in i64 minor units
        assert_eq!(to_minor_units("100000000000000000000"), None);
        assert_eq!(json_to_minor_units(&json!("999999999999999999999999999")), None);
    }

    #[test]
    fn test_json_amounts() {
        assert_eq!(json_to_minor_units(&json!("0.01")), Some(1));
        assert_eq!(json_to_minor_units(&json!(0.01)), Some(1));
        assert_eq!(json_to_minor_units(&json!(12)), Some(1200));
        assert_eq!(json_to_minor_units(&json!(null)), None);
    }

    #[test]
    fn test_to_major_units() {
        assert_eq!(to_major_units(1), dec!(0.01));
        assert_eq!(to_major_units(12345), dec!(123.45));
        assert_eq!(to_major_units(100).to_string(), "1");
        assert_eq!(to_major_units(1230).to_string(), "12.3");
        assert_eq!(to_major_units(1234).to_string(), "12.34");
        assert_eq!(to_major_units(0).to_string(), "0");
    }
}
