use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::VipsptError;

/// Gateway operations understood by this adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Barcode (merchant-scans-customer) payment.
    Pay,
    Query,
    Refund,
    RefundQuery,
    WeixinJsApi,
    AlipayJsApi,
    QrCode,
    OpenId,
    /// Asynchronous payment notification. Never sent to the gateway.
    Notify,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Pay,
        Operation::Query,
        Operation::Refund,
        Operation::RefundQuery,
        Operation::WeixinJsApi,
        Operation::AlipayJsApi,
        Operation::QrCode,
        Operation::OpenId,
        Operation::Notify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Pay => "pay.pay",
            Operation::Query => "pay.query",
            Operation::Refund => "pay.refund",
            Operation::RefundQuery => "pay.refundQuery",
            Operation::WeixinJsApi => "pay.weixinJsapi",
            Operation::AlipayJsApi => "pay.alipayJsapi",
            Operation::QrCode => "pay.qrcode",
            Operation::OpenId => "pay.openid",
            Operation::Notify => "pay.notify",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = VipsptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| VipsptError::UnsupportedOperation(s.to_string()))
    }
}

/// A scalar business parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    /// Serialized as a JSON string, e.g. `"0.01"`.
    Decimal(Decimal),
}

impl ParamValue {
    /// Convert an inbound JSON value. Numbers keep their literal text;
    /// null, arrays and objects have no scalar form and render empty.
    pub fn from_json(value: &Value) -> ParamValue {
        match value {
            Value::String(s) => ParamValue::Str(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => ParamValue::Str(n.to_string()),
            },
            Value::Bool(b) => ParamValue::Str(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => ParamValue::Str(String::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParamValue::Str(s) if s.is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<Decimal> for ParamValue {
    fn from(d: Decimal) -> Self {
        ParamValue::Decimal(d)
    }
}

/// Business parameters, kept sorted by key byte order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Params(
            object
                .iter()
                .map(|(k, v)| (k.clone(), ParamValue::from_json(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One outbound gateway call: the operation and its business parameters.
#[derive(Debug, Clone)]
pub struct CommonRequest {
    pub operation: Operation,
    pub params: Params,
}

impl CommonRequest {
    pub fn new(operation: Operation, params: Params) -> Self {
        Self { operation, params }
    }
}
