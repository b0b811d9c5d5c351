use std::collections::HashMap;

use serde::Serialize;

/// Body encoding of an inbound webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyBodyType {
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

/// An inbound gateway webhook, as received by the HTTP layer.
#[derive(Debug, Clone)]
pub struct NotifyRequest {
    /// Query parameters; `id` correlates the notification to an order.
    pub query: HashMap<String, String>,
    pub body: String,
    pub body_type: NotifyBodyType,
}

/// What is handed to the trade service after the webhook is accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardedNotify {
    pub id: String,
    /// The body parameters re-encoded as a JSON object string.
    pub notify_data: String,
}

/// Answer returned to the gateway's webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAck {
    pub status_code: u16,
    pub body: &'static str,
}

impl NotifyAck {
    pub const SUCCESS_BODY: &'static str = "success";
    pub const FAIL_BODY: &'static str = "FAIL";

    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: Self::SUCCESS_BODY,
        }
    }

    pub fn fail() -> Self {
        Self {
            status_code: 200,
            body: Self::FAIL_BODY,
        }
    }
}
