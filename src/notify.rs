use std::future::Future;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::VipsptClient;
use crate::crypto::sign::{canonicalize_include_empty, canonicalize_skip_empty};
use crate::crypto::verify::verify_signature;
use crate::error::VipsptError;
use crate::model::notify::{ForwardedNotify, NotifyAck, NotifyBodyType, NotifyRequest};
use crate::model::params::{Operation, Params};
use crate::model::response::DecodedResponse;
use crate::model::trade::{ReturnCode, TradeResult};
use crate::transport::Transport;

/// Query parameter correlating a webhook with the trade service's order.
pub const ID_PARAM: &str = "id";

/// The trade service that owns orders and receives accepted notifications.
pub trait NotifyForwarder: Send + Sync {
    /// Hand the notification over; the answer decides the gateway ack.
    fn forward(
        &self,
        notify: &ForwardedNotify,
    ) -> impl Future<Output = Result<ReturnCode, VipsptError>> + Send;
}

/// Accept a gateway webhook and relay it to the trade service.
///
/// The acknowledgment reflects whether the trade service took the
/// notification, never the trade status inside it.
pub async fn handle_webhook<F: NotifyForwarder>(
    req: &NotifyRequest,
    forwarder: &F,
) -> Result<NotifyAck, VipsptError> {
    let id = req
        .query
        .get(ID_PARAM)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            warn!("rejected notification without id");
            VipsptError::Notify("missing id query parameter".into())
        })?;

    let notify_data = body_to_json(req)?;
    debug!(id, body_type = ?req.body_type, "forwarding notification");
    let forwarded = ForwardedNotify {
        id: id.to_string(),
        notify_data,
    };

    match forwarder.forward(&forwarded).await? {
        ReturnCode::Success => {
            info!(id, "notification accepted");
            Ok(NotifyAck::success())
        }
        ReturnCode::Fail => {
            warn!(id, "trade service declined notification");
            Ok(NotifyAck::fail())
        }
    }
}

/// Re-encode the webhook body as a JSON object string.
fn body_to_json(req: &NotifyRequest) -> Result<String, VipsptError> {
    if req.body.trim().is_empty() {
        return Ok("{}".into());
    }
    let object = match req.body_type {
        NotifyBodyType::Json => match serde_json::from_str::<Value>(&req.body) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                return Err(VipsptError::Notify(
                    "notification body is not a JSON object".into(),
                ));
            }
            Err(e) => {
                return Err(VipsptError::decode(
                    format!("invalid notification JSON: {e}"),
                    req.body.as_bytes(),
                ));
            }
        },
        NotifyBodyType::Form => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&req.body)
                .map_err(|e| VipsptError::Notify(format!("invalid form body: {e}")))?;
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<String, Value>>()
        }
    };
    Ok(serde_json::to_string(&object)?)
}

impl<T: Transport> VipsptClient<T> {
    /// Verify and normalize a forwarded notification.
    ///
    /// The signature covers every non-empty field except `sign`, checked
    /// against the gateway certificate with the configured sign type.
    pub async fn parse_notify(&self, notify_data: &str) -> Result<TradeResult, VipsptError> {
        let decoded = match serde_json::from_str::<Value>(notify_data) {
            Ok(Value::Object(object)) => DecodedResponse::new(object),
            Ok(_) => {
                return Err(VipsptError::Notify(
                    "notification data is not a JSON object".into(),
                ));
            }
            Err(e) => {
                return Err(VipsptError::decode(
                    format!("invalid notification JSON: {e}"),
                    notify_data.as_bytes(),
                ));
            }
        };

        let signed_data = canonicalize_skip_empty(&Params::from_json_object(decoded.as_map()));
        self.verify_signed(&decoded, signed_data).await?;

        let result = self.normalize(Operation::Notify, &decoded)?;
        info!(
            out_trade_no = result.out_trade_no.as_deref().unwrap_or_default(),
            status = ?result.status,
            "notification verified"
        );
        Ok(result)
    }

    /// Verify a synchronous response that embeds a `sign`.
    ///
    /// Empty fields are part of the signed string here.
    pub async fn verify_response(&self, decoded: &DecodedResponse) -> Result<(), VipsptError> {
        let signed_data = canonicalize_include_empty(&Params::from_json_object(decoded.as_map()));
        self.verify_signed(decoded, signed_data).await
    }

    async fn verify_signed(
        &self,
        decoded: &DecodedResponse,
        signed_data: String,
    ) -> Result<(), VipsptError> {
        let signature = decoded
            .text("sign")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| VipsptError::Signature("missing sign field".into()))?;
        let source = self.config.certificate.clone().ok_or_else(|| {
            VipsptError::Config("gateway public key is not configured".into())
        })?;
        let algorithm = self.config.digest_algorithm();

        debug!(?algorithm, "verifying gateway signature");
        // Certificate reads and RSA verification block.
        tokio::task::spawn_blocking(move || {
            verify_signature(&signed_data, &signature, &source, algorithm)
        })
        .await
        .map_err(|e| VipsptError::Signature(format!("task join: {e}")))?
        .inspect_err(|e| warn!(error = %e, "gateway signature rejected"))
    }
}
