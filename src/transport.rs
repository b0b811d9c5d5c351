use std::future::Future;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::response::{ContentType, RawResponse};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway answered HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// Sends a JSON body to the gateway and hands back the raw answer.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] over a `reqwest::Client`.
///
/// Timeouts, proxies and TLS settings belong to the supplied client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, TransportError> {
        debug!(url, "posting to gateway");
        let resp = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(ContentType::Text, ContentType::from_header);
        let body = resp.bytes().await?;
        Ok(RawResponse::new(body, content_type))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// In-memory transport that records every request and replays canned
    /// answers in order.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub requests: Mutex<Vec<(String, Value)>>,
        responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    }

    impl RecordingTransport {
        pub fn replying(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        pub fn json(body: Value) -> Self {
            Self::replying(vec![Ok(RawResponse::json(body.to_string()))])
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> (String, Value) {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for RecordingTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no canned response".into())))
        }
    }
}
