use std::collections::HashMap;

use crate::error::VipsptError;
use crate::model::params::Operation;

/// Operation → URL path on the gateway.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    paths: HashMap<Operation, String>,
}

impl EndpointTable {
    pub fn empty() -> Self {
        Self {
            paths: HashMap::new(),
        }
    }

    /// Register or replace the path for `operation`.
    pub fn with_path(mut self, operation: Operation, path: impl Into<String>) -> Self {
        self.paths.insert(operation, path.into());
        self
    }

    pub fn resolve(&self, operation: Operation) -> Result<&str, VipsptError> {
        self.paths
            .get(&operation)
            .map(String::as_str)
            .ok_or_else(|| {
                VipsptError::UnsupportedOperation(format!("no endpoint configured for {operation}"))
            })
    }
}

impl Default for EndpointTable {
    /// The gateway's published paths. Query and refund query share one path.
    fn default() -> Self {
        Self::empty()
            .with_path(Operation::Pay, "/payOpen/bToC")
            .with_path(Operation::Query, "/payOpen/query.do")
            .with_path(Operation::Refund, "/payOpen/refund.do")
            .with_path(Operation::RefundQuery, "/payOpen/query.do")
    }
}
