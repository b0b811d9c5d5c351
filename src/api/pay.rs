use chrono::Local;
use serde_json::json;
use tracing::debug;

use crate::amount::to_major_units;
use crate::client::{VipsptClient, encode_query_value};
use crate::error::VipsptError;
use crate::model::params::{CommonRequest, Operation, Params};
use crate::model::pay::{BarcodePayRequest, JsApiPayRequest, OpenIdRequest, PayMethod};
use crate::model::trade::{ReturnCode, TradeResult};
use crate::transport::Transport;

/// Longest `out_order_id` the barcode endpoint accepts.
pub const MAX_OUT_TRADE_NO_LEN: usize = 18;

const DEFAULT_CLIENT_IP: &str = "127.0.0.1";
const JSAPI_TIMEOUT_EXPRESS: &str = "10m";
const JSAPI_BUSINESS_CODE: &str = "00510030";

impl<T: Transport> VipsptClient<T> {
    /// Barcode payment.
    ///
    /// POST /payOpen/bToC
    pub async fn barcode_pay(&self, req: &BarcodePayRequest) -> Result<TradeResult, VipsptError> {
        let pay_way = match req.method {
            PayMethod::Wechat => "WXZF",
            PayMethod::Alipay => "ZFBZF",
            other => {
                return Err(VipsptError::UnsupportedOperation(format!(
                    "barcode payment with {other}"
                )));
            }
        };
        if req.out_trade_no.chars().count() > MAX_OUT_TRADE_NO_LEN {
            return Err(VipsptError::InvalidParam(format!(
                "out_trade_no must be at most {MAX_OUT_TRADE_NO_LEN} characters"
            )));
        }

        let params = Params::new()
            .with("merchant_id", self.config.merchant_id.as_str())
            .with("enterpriseReg", self.config.enterprise_reg.as_str())
            .with("pay_way", pay_way)
            .with("out_order_id", req.out_trade_no.as_str())
            .with(
                "sMchtIp",
                req.client_ip.as_deref().unwrap_or(DEFAULT_CLIENT_IP),
            )
            .with("sAuthCode", req.auth_code.as_str())
            .with("amount", to_major_units(req.total_fee))
            .with(
                "date_time",
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            );
        self.execute(&CommonRequest::new(Operation::Pay, params))
            .await
    }

    /// WeChat official-account or Alipay life-account payment.
    ///
    /// The path must be registered on the client's endpoint table.
    pub async fn jsapi_pay(&self, req: &JsApiPayRequest) -> Result<TradeResult, VipsptError> {
        let mut params = Params::new()
            .with("out_trade_no", req.out_trade_no.as_str())
            .with("shopdate", Local::now().format("%Y%m%d").to_string())
            .with("subject", req.title.as_str())
            .with("total_amount", to_major_units(req.total_fee))
            .with("seller_id", self.config.merchant_id.as_str())
            .with("timeout_express", JSAPI_TIMEOUT_EXPRESS)
            .with("business_code", JSAPI_BUSINESS_CODE);
        if let Some(notify_url) = &self.config.notify_url {
            params.insert(
                "notify_url",
                format!("{notify_url}?id={}", encode_query_value(&req.id)),
            );
        }

        let operation = match req.method {
            PayMethod::Wechat => {
                let app_id = req
                    .app_id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .or(self.config.wechat_app_id.as_deref())
                    .unwrap_or_default();
                params.insert("sub_openid", req.open_id.as_str());
                params.insert("appid", app_id);
                Operation::WeixinJsApi
            }
            PayMethod::Alipay => {
                params.insert("buyer_id", req.open_id.as_str());
                Operation::AlipayJsApi
            }
            PayMethod::Unionpay => {
                return Err(VipsptError::UnsupportedOperation(
                    "jsapi payment with unionpay".into(),
                ));
            }
        };
        self.execute(&CommonRequest::new(operation, params)).await
    }

    /// The gateway's QR code endpoint is not used; payers scan the
    /// merchant's own aggregated code.
    pub async fn qr_code(&self) -> Result<TradeResult, VipsptError> {
        debug!("returning self-aggregated qr code");
        let mut result = TradeResult::new(
            ReturnCode::Success,
            json!({"return_code": "SUCCESS", "return_msg": "SUCCESS", "qr_code": "self"}),
        );
        result.return_msg = "SUCCESS".into();
        result.qr_code = Some("self".into());
        Ok(result)
    }

    /// Resolve a WeChat openid from a payment code.
    pub async fn open_id(&self, req: &OpenIdRequest) -> Result<TradeResult, VipsptError> {
        if req.method != PayMethod::Wechat {
            return Err(VipsptError::UnsupportedOperation(format!(
                "openid lookup with {}",
                req.method
            )));
        }
        let params = Params::new()
            .with("usercode", self.config.merchant_id.as_str())
            .with("auth_code", req.auth_code.as_str())
            .with("subAppId", req.app_id.as_deref().unwrap_or_default());
        self.execute(&CommonRequest::new(Operation::OpenId, params))
            .await
    }

    /// Face payment is not offered by this gateway.
    pub async fn wx_face_pay_info(&self) -> Result<TradeResult, VipsptError> {
        Err(VipsptError::UnsupportedOperation(
            "wechat face payment".into(),
        ))
    }
}
