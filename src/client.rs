use chrono::Utc;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::crypto::sign::sign_sha256;
use crate::decode::decode;
use crate::endpoint::EndpointTable;
use crate::error::VipsptError;
use crate::model::params::{CommonRequest, Operation, Params};
use crate::model::response::DecodedResponse;
use crate::model::trade::TradeResult;
use crate::normalize::NormalizerTable;
use crate::transport::{HttpTransport, Transport};

pub struct VipsptClient<T = HttpTransport> {
    pub(crate) config: ClientConfig,
    endpoints: EndpointTable,
    normalizers: NormalizerTable,
    transport: T,
}

impl VipsptClient<HttpTransport> {
    /// Create a client over a default `reqwest::Client`.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, HttpTransport::default())
    }
}

impl<T: Transport> VipsptClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            endpoints: EndpointTable::default(),
            normalizers: NormalizerTable::default(),
            transport,
        }
    }

    /// Replace the endpoint table, e.g. to register JS-API paths.
    pub fn with_endpoints(mut self, endpoints: EndpointTable) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_normalizers(mut self, normalizers: NormalizerTable) -> Self {
        self.normalizers = normalizers;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sign, send, decode and normalize one gateway call.
    ///
    /// Business failures reported by the gateway come back as
    /// `Ok(TradeResult)` with `return_code = FAIL`.
    pub async fn execute(&self, request: &CommonRequest) -> Result<TradeResult, VipsptError> {
        let operation = request.operation;
        let path = self.endpoints.resolve(operation)?;
        let url = format!("{}{path}", self.config.base_url);
        let body = self.build_body(&request.params)?;

        debug!(%operation, %url, "sending signed request");
        let raw = self.transport.post_json(&url, &body).await?;
        let decoded = decode(&raw)?;
        let result = self.normalize(operation, &decoded)?;

        info!(
            %operation,
            return_code = ?result.return_code,
            status = ?result.status,
            "gateway exchange complete"
        );
        Ok(result)
    }

    /// [`execute`](Self::execute) with the operation given by its wire name.
    pub async fn execute_named(
        &self,
        name: &str,
        params: Params,
    ) -> Result<TradeResult, VipsptError> {
        let operation: Operation = name.parse()?;
        self.execute(&CommonRequest::new(operation, params)).await
    }

    pub(crate) fn normalize(
        &self,
        operation: Operation,
        decoded: &DecodedResponse,
    ) -> Result<TradeResult, VipsptError> {
        self.normalizers.normalize(operation, decoded)
    }

    /// `{appid, timeStamp, sign, data}`; only `data` is signed.
    fn build_body(&self, params: &Params) -> Result<Value, VipsptError> {
        let sign = sign_sha256(params, &self.config.secret_key);
        Ok(json!({
            "appid": self.config.appid,
            "timeStamp": Utc::now().timestamp_millis(),
            "sign": sign,
            "data": serde_json::to_value(params)?,
        }))
    }
}

/// Percent-encode a string so it is safe to use as a query value.
pub(crate) fn encode_query_value(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}
