use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::VipsptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayMethod {
    Wechat,
    Alipay,
    Unionpay,
}

impl PayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMethod::Wechat => "wechat",
            PayMethod::Alipay => "alipay",
            PayMethod::Unionpay => "unionpay",
        }
    }
}

impl fmt::Display for PayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayMethod {
    type Err = VipsptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wechat" => Ok(PayMethod::Wechat),
            "alipay" => Ok(PayMethod::Alipay),
            "unionpay" => Ok(PayMethod::Unionpay),
            other => Err(VipsptError::UnsupportedOperation(format!(
                "payment method {other}"
            ))),
        }
    }
}

/// Barcode payment: the merchant scans the payer's code.
#[derive(Debug, Clone, Deserialize)]
pub struct BarcodePayRequest {
    pub method: PayMethod,
    /// At most 18 characters.
    pub out_trade_no: String,
    /// Minor currency units.
    pub total_fee: i64,
    pub auth_code: String,
    #[serde(default)]
    pub client_ip: Option<String>,
}

/// In-app / official-account payment.
#[derive(Debug, Clone, Deserialize)]
pub struct JsApiPayRequest {
    /// Trade-service order id, echoed back on the notify URL.
    pub id: String,
    pub method: PayMethod,
    pub out_trade_no: String,
    pub total_fee: i64,
    pub title: String,
    /// WeChat openid or Alipay buyer id.
    pub open_id: String,
    /// WeChat app id; falls back to the configured one.
    #[serde(default)]
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenIdRequest {
    pub method: PayMethod,
    pub auth_code: String,
    #[serde(default)]
    pub app_id: Option<String>,
}
