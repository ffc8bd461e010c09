use serde_json::Value;

use watch_common::error::WatchError;

use crate::transport::{HttpTransport, StatusRequest};

/// Decoded reply of the status service for one query window.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    /// Full decoded body; structure is checked later by the validator.
    pub payload: Value,
    /// Cursor for the next query, when the service supplied one.
    pub current_date: Option<i64>,
}

/// Performs one status query per call and classifies every way it can fail.
pub struct StatusFetcher<H> {
    transport: H,
    endpoint: String,
    token: String,
}

impl<H: HttpTransport> StatusFetcher<H> {
    pub fn new(transport: H, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query the status service for changes since `cursor` (Unix seconds).
    pub async fn fetch(&self, cursor: i64) -> Result<StatusResponse, WatchError> {
        let request = StatusRequest {
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            from_date: cursor,
        };

        let raw = self
            .transport
            .get(&request)
            .await
            .map_err(|e| WatchError::Transport {
                endpoint: request.endpoint.clone(),
                params: request.params(),
                detail: format!("{e:#}"),
            })?;

        if !(200..300).contains(&raw.status) {
            return Err(WatchError::StatusCode {
                endpoint: request.endpoint.clone(),
                params: request.params(),
                code: raw.status,
            });
        }

        let payload: Value = serde_json::from_str(&raw.body)
            .map_err(|e| WatchError::Shape(format!("тело ответа не является JSON: {e}")))?;

        if let Some(object) = payload.as_object()
            && (object.contains_key("error") || object.contains_key("code"))
        {
            return Err(WatchError::RemoteDenied {
                endpoint: request.endpoint.clone(),
                params: request.params(),
                code: object.get("code").cloned().unwrap_or(Value::Null),
                error: object.get("error").cloned().unwrap_or(Value::Null),
            });
        }

        let current_date = match payload.get("current_date") {
            None | Some(Value::Null) => None,
            Some(value) => {
                let cursor = value.as_i64();
                if cursor.is_none() {
                    tracing::warn!(
                        current_date = %value,
                        "Ignoring non-integer current_date in status response"
                    );
                }
                cursor
            }
        };

        tracing::debug!(
            from_date = cursor,
            next_cursor = ?current_date,
            "Status query completed"
        );

        Ok(StatusResponse {
            payload,
            current_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::transport::RawResponse;

    const ENDPOINT: &str = "https://status.example/api/user_api/homework_statuses/";

    /// Replies with one canned result and remembers the request it saw.
    struct CannedTransport {
        reply: Result<RawResponse, String>,
        seen: Mutex<Vec<StatusRequest>>,
    }

    impl CannedTransport {
        fn ok(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                reply: Err(detail.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn get(&self, request: &StatusRequest) -> anyhow::Result<RawResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn fetcher(transport: CannedTransport) -> StatusFetcher<CannedTransport> {
        StatusFetcher::new(transport, ENDPOINT, "y0_token")
    }

    #[tokio::test]
    async fn test_fetch_success_with_cursor() {
        let body = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        })
        .to_string();
        let f = fetcher(CannedTransport::ok(200, &body));

        let resp = f.fetch(500).await.unwrap();
        assert_eq!(resp.current_date, Some(1000));
        assert_eq!(resp.payload["homeworks"][0]["homework_name"], "hw1");

        let seen = f.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].from_date, 500);
        assert_eq!(seen[0].token, "y0_token");
        assert_eq!(seen[0].endpoint, ENDPOINT);
    }

    #[tokio::test]
    async fn test_fetch_without_cursor() {
        let f = fetcher(CannedTransport::ok(200, r#"{"homeworks": []}"#));
        let resp = f.fetch(500).await.unwrap();
        assert_eq!(resp.current_date, None);
    }

    #[tokio::test]
    async fn test_fetch_ignores_non_integer_cursor() {
        let f = fetcher(CannedTransport::ok(
            200,
            r#"{"homeworks": [], "current_date": "yesterday"}"#,
        ));
        let resp = f.fetch(500).await.unwrap();
        assert_eq!(resp.current_date, None);
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let f = fetcher(CannedTransport::failing("connection refused"));
        let err = f.fetch(500).await.unwrap_err();
        match &err {
            WatchError::Transport {
                endpoint,
                params,
                detail,
            } => {
                assert_eq!(endpoint, ENDPOINT);
                assert_eq!(params, "from_date=500");
                assert!(detail.contains("connection refused"));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
        assert!(!err.to_string().contains("y0_token"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let f = fetcher(CannedTransport::ok(503, "Service Unavailable"));
        let err = f.fetch(500).await.unwrap_err();
        assert!(matches!(
            err,
            WatchError::StatusCode { code: 503, ref params, .. } if params == "from_date=500"
        ));
    }

    #[tokio::test]
    async fn test_fetch_remote_denied_with_code_only() {
        let f = fetcher(CannedTransport::ok(
            200,
            r#"{"code": "not_authenticated", "message": "Учетные данные не были предоставлены."}"#,
        ));
        let err = f.fetch(500).await.unwrap_err();
        match err {
            WatchError::RemoteDenied { code, error, .. } => {
                assert_eq!(code, json!("not_authenticated"));
                assert_eq!(error, Value::Null);
            }
            other => panic!("expected RemoteDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_remote_denied_with_error_only() {
        let f = fetcher(CannedTransport::ok(
            200,
            r#"{"error": {"error": "Wrong from_date format"}}"#,
        ));
        assert!(matches!(
            f.fetch(500).await,
            Err(WatchError::RemoteDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_body_not_json() {
        let f = fetcher(CannedTransport::ok(200, "<html>maintenance</html>"));
        assert!(matches!(f.fetch(500).await, Err(WatchError::Shape(_))));
    }

    #[tokio::test]
    async fn test_fetch_leaves_shape_to_validator() {
        let f = fetcher(CannedTransport::ok(200, r#"["not", "a", "mapping"]"#));
        let resp = f.fetch(500).await.unwrap();
        assert!(resp.payload.is_array());
        assert_eq!(resp.current_date, None);
    }
}
