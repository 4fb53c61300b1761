//! Statistics submission

use async_trait::async_trait;
use popreport_core::payload::{ExternalPayload, StatisticsRequest};
use tracing::{debug, warn};

use crate::StatisticsClient;
use crate::error::Result;

/// Response received from the statistics service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsResponse {
    /// HTTP status code, reported but not interpreted
    pub status: u16,
    /// Raw response body
    pub body: String,
}

/// Anything that can answer a statistics query
///
/// Implementations make exactly one attempt per call. An `Err` means no
/// complete response was received; any received response is an `Ok`.
#[async_trait]
pub trait StatisticsService: Send + Sync {
    async fn submit(&self, payload: &ExternalPayload) -> Result<StatisticsResponse>;
}

#[async_trait]
impl StatisticsService for StatisticsClient {
    async fn submit(&self, payload: &ExternalPayload) -> Result<StatisticsResponse> {
        debug!(
            request_id = %payload.request_id,
            vertices = payload.polygon.len(),
            "Posting statistics request to {}",
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&StatisticsRequest::from(payload))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = decode_body(&payload.request_id, &response.bytes().await?);

        debug!(
            request_id = %payload.request_id,
            status,
            bytes = body.len(),
            "Statistics response received"
        );

        Ok(StatisticsResponse { status, body })
    }
}

/// Body bytes as UTF-8, ignoring any declared charset
///
/// Invalid sequences are replaced rather than failing the job.
fn decode_body(request_id: &str, bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!(
                request_id = %request_id,
                "Statistics response is not valid UTF-8 ({}), replacing invalid bytes",
                e
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{StatusCode, header},
        routing::post,
    };
    use popreport_core::geo::CoordinatePoint;
    use popreport_core::payload::try_build_payload;
    use std::net::SocketAddr;
    use std::time::Duration;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn payload() -> ExternalPayload {
        try_build_payload(&CoordinatePoint::new(10.0, 50.0), 1.0).unwrap()
    }

    #[tokio::test]
    async fn test_posts_input_data_envelope() {
        let app = Router::new().route(
            "/execute",
            post(|Json(body): Json<serde_json::Value>| async move { Json(body) }),
        );
        let addr = serve(app).await;
        let client = StatisticsClient::new(format!("http://{addr}/execute")).unwrap();
        let payload = payload();

        let response = client.submit(&payload).await.unwrap();
        assert_eq!(response.status, 200);

        let echoed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            echoed["Input_Data"]["requestId"],
            serde_json::json!(payload.request_id)
        );
        assert_eq!(
            echoed["Input_Data"]["statistics"],
            serde_json::json!(["SUM", "MEAN"])
        );
        assert_eq!(
            echoed["Input_Data"]["polygon"].as_array().unwrap().len(),
            payload.polygon.len()
        );
    }

    #[tokio::test]
    async fn test_error_status_is_still_a_response() {
        let app = Router::new().route(
            "/execute",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let addr = serve(app).await;
        let client = StatisticsClient::new(format!("http://{addr}/execute")).unwrap();

        let response = client.submit(&payload()).await.unwrap();
        assert_eq!(response.status, 502);
        assert_eq!(response.body, "upstream unavailable");
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let app = Router::new().route(
            "/execute",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                "too late"
            }),
        );
        let addr = serve(app).await;
        let client = StatisticsClient::with_timeout(
            format!("http://{addr}/execute"),
            Some(Duration::from_millis(100)),
        )
        .unwrap();

        let err = client.submit(&payload()).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert!(!err.describe().is_empty());
    }

    #[tokio::test]
    async fn test_refused_connection_is_reported() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = StatisticsClient::new(format!("http://{addr}/execute")).unwrap();
        let err = client.submit(&payload()).await.unwrap_err();
        assert!(err.is_connect(), "expected connect error, got {err:?}");
        assert!(err.describe().starts_with("HTTP request failed"));
    }

    #[tokio::test]
    async fn test_body_is_not_recoded_by_charset() {
        let app = Router::new().route(
            "/execute",
            post(|| async {
                (
                    [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
                    "Zürich",
                )
            }),
        );
        let addr = serve(app).await;
        let client = StatisticsClient::new(format!("http://{addr}/execute")).unwrap();

        let response = client.submit(&payload()).await.unwrap();
        assert_eq!(response.body, "Zürich");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode_body("r1", b"ok"), "ok");
        assert_eq!(decode_body("r1", b"a\xffb"), "a\u{fffd}b");
    }
}
