use crate::client::VipsptClient;
use crate::error::VipsptError;
use crate::model::order::QueryRequest;
use crate::model::params::{CommonRequest, Operation, Params};
use crate::model::trade::TradeResult;
use crate::transport::Transport;

impl<T: Transport> VipsptClient<T> {
    /// Query a payment by merchant order number.
    ///
    /// POST /payOpen/query.do
    pub async fn query(&self, req: &QueryRequest) -> Result<TradeResult, VipsptError> {
        let params = Params::new()
            .with("out_trade_no", req.out_trade_no.as_str())
            .with("shopdate", req.created_at.format("%Y%m%d").to_string());
        self.execute(&CommonRequest::new(Operation::Query, params))
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

    fn request() -> QueryRequest {
        QueryRequest {
            out_trade_no: "Y".into(),
            created_at: DateTime::parse_from_rfc3339("2022-09-09T23:30:00+08:00").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_query_uses_order_shop_date() {
        let client = client(RecordingTransport::json(json!({
            "code": "10000",
            "trade_status": "TRADE_SUCCESS",
            "total_amount": "0.01",
            "trade_no": "X",
            "out_trade_no": "Y",
        })));
        let result = client.query(&request()).await.unwrap();
        assert_eq!(result.return_code, ReturnCode::Success);
        assert_eq!(result.status, Some(TradeStatus::Success));
        assert_eq!(result.total_fee, Some(1));

        let (url, body) = client.transport_requests().pop().unwrap();
        assert!(url.ends_with("/payOpen/query.do"));
        // the order's own offset decides the date, not UTC
        assert_eq!(body["data"], json!({"out_trade_no": "Y", "shopdate": "20220909"}));
    }

    #[tokio::test]
    async fn test_query_not_found_is_closed() {
        let client = client(RecordingTransport::json(json!({
            "code": "40004",
            "msg": "Business Failed",
            "sub_code": "ACQ.QUERY_NO_RESULT",
        })));
        let result = client.query(&request()).await.unwrap();
        assert_eq!(result.return_code, ReturnCode::Fail);
        assert_eq!(result.status, Some(TradeStatus::Closed));
    }

    #[test]
    fn test_query_request_deserialize() {
        let req: QueryRequest = serde_json::from_str(
            r#"{"out_trade_no":"Y","created_at":"2022-09-09T23:30:00+08:00"}"#,
        )
        .unwrap();
        assert_eq!(req.created_at.format("%Y%m%d").to_string(), "20220909");
    }
}
