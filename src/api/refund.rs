use crate::amount::to_major_units;
use crate::client::VipsptClient;
use crate::error::VipsptError;
use crate::model::params::{CommonRequest, Operation, Params};
use crate::model::refund::{RefundQueryRequest, RefundRequest};
use crate::model::trade::TradeResult;
use crate::transport::Transport;

const DEFAULT_REFUND_REASON: &str = "退款";

impl<T: Transport> VipsptClient<T> {
    /// Request a refund. A successful answer only means the refund was
    /// accepted; poll [`refund_query`](Self::refund_query) for the outcome.
    ///
    /// POST /payOpen/refund.do
    pub async fn refund(&self, req: &RefundRequest) -> Result<TradeResult, VipsptError> {
        let reason = req
            .reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REFUND_REASON);
        let params = Params::new()
            .with("out_trade_no", req.out_trade_no.as_str())
            .with(
                "shopdate",
                req.order_created_at.format("%Y%m%d").to_string(),
            )
            .with("refund_amount", to_major_units(req.refund_fee))
            .with("refund_reason", reason)
            .with("out_request_no", req.out_refund_no.as_str());
        self.execute(&CommonRequest::new(Operation::Refund, params))
            .await
    }

    /// Query a refund.
    ///
    /// POST /payOpen/query.do
    pub async fn refund_query(
        &self,
        req: &RefundQueryRequest,
    ) -> Result<TradeResult, VipsptError> {
        let params = Params::new()
            .with("out_trade_no", req.out_trade_no.as_str())
            .with("out_request_no", req.out_refund_no.as_str());
        self.execute(&CommonRequest::new(Operation::RefundQuery, params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::client;
    use crate::model::trade::{ReturnCode, TradeStatus};
    use crate::transport::testing::RecordingTransport;
    use chrono::DateTime;
    use serde_json::json;

    fn refund_request(reason: Option<&str>) -> RefundRequest {
        RefundRequest {
            out_trade_no: "T1".into(),
            out_refund_no: "T1-1".into(),
            refund_fee: 29,
            reason: reason.map(String::from),
            order_created_at: DateTime::parse_from_rfc3339("2022-09-09T10:00:00+08:00")
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_refund_params_and_default_reason() {
        let client = client(RecordingTransport::json(json!({
            "code": "10000",
            "refund_amount": "0.29",
            "refundsn": "R1",
            "out_request_no": "T1-1",
        })));
        let result = client.refund(&refund_request(None)).await.unwrap();
        assert_eq!(result.status, Some(TradeStatus::Waiting));
        assert_eq!(result.refund_fee, Some(29));

        let (url, body) = client.transport_requests().pop().unwrap();
        assert!(url.ends_with("/payOpen/refund.do"));
        assert_eq!(
            body["data"],
            json!({
                "out_trade_no": "T1",
                "shopdate": "20220909",
                "refund_amount": "0.29",
                "refund_reason": "退款",
                "out_request_no": "T1-1",
            })
        );
    }

    #[tokio::test]
    async fn test_refund_custom_reason() {
        let client = client(RecordingTransport::json(json!({"code": "10000"})));
        client
            .refund(&refund_request(Some("damaged")))
            .await
            .unwrap();
        let (_, body) = client.transport_requests().pop().unwrap();
        assert_eq!(body["data"]["refund_reason"], "damaged");
    }

    #[tokio::test]
    async fn test_refund_ret_family_unknown_status() {
        let client = client(RecordingTransport::json(json!({
            "ret": "0",
            "data": {"status": "11"},
        })));
        let result = client.refund(&refund_request(None)).await.unwrap();
        assert_eq!(result.return_code, ReturnCode::Success);
        assert_eq!(result.status, Some(TradeStatus::Waiting));
    }

    #[tokio::test]
    async fn test_refund_query() {
        let client = client(RecordingTransport::json(json!({
            "code": "10000",
            "refund_state": "fail",
        })));
        let result = client
            .refund_query(&RefundQueryRequest {
                out_trade_no: "T1".into(),
                out_refund_no: "T1-1".into(),
            })
            .await
            .unwrap();
        assert_eq!(result.status, Some(TradeStatus::Closed));

        let (url, body) = client.transport_requests().pop().unwrap();
        assert!(url.ends_with("/payOpen/query.do"));
        assert_eq!(body["data"], json!({"out_trade_no": "T1", "out_request_no": "T1-1"}));
    }
}
