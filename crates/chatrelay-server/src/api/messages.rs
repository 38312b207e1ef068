//! Inbound message endpoint
//!
//! POST /api/whatsapp: look up or create the caller's user record, forward
//! the message plus record to the agent, relay the reply back verbatim.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessageRequest {
    pub phone_number: String,
    pub message: String,
}

/// On success `message` carries the agent's reply text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessageResponse {
    pub phone_number: String,
    pub message: String,
}

pub async fn relay_message(
    State(core): State<AppState>,
    Json(request): Json<RelayMessageRequest>,
) -> Result<Json<RelayMessageResponse>, ApiError> {
    let phone_number = request.phone_number.trim();
    if phone_number.is_empty() {
        return Err(ApiError::bad_request("phoneNumber must not be empty"));
    }
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    info!(
        phone = %phone_number,
        message_len = request.message.len(),
        "Relay request received"
    );

    // Strictly sequential: the relay never starts if the directory failed.
    let user = core.directory.get_or_create(phone_number).await?;
    let reply = core.relay.forward(&request.message, &user).await?;

    Ok(Json(RelayMessageResponse {
        phone_number: phone_number.to_string(),
        message: reply.into_text(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chatrelay_core::{AppCore, Config};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(agent_url: &str, db_path: &str, timeout_secs: u64) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            db_path: db_path.to_string(),
            agent_url: agent_url.to_string(),
            agent_timeout_secs: timeout_secs,
            cors_origins: Vec::new(),
        }
    }

    async fn test_app(
        agent_url: &str,
        timeout_secs: u64,
    ) -> (axum::Router, Arc<AppCore>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = test_config(agent_url, db_path.to_str().unwrap(), timeout_secs);
        let core = Arc::new(AppCore::new(&config).unwrap());
        (router(core.clone()), core, temp_dir)
    }

    fn relay_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/whatsapp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _core, _tmp) = test_app("http://127.0.0.1:9", 5).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_first_contact_relays_and_persists() {
        let mock_server = MockServer::start().await;
        let reply = "Agent response based on message: 'hello' and user data: {...}";
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(reply))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (app, core, _tmp) = test_app(&mock_server.uri(), 5).await;

        let response = app
            .oneshot(relay_request(
                r#"{"phoneNumber": "+1555", "message": "hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["phoneNumber"], "+1555");
        assert_eq!(body["message"], reply);

        assert!(core.storage.users.exists("+1555").unwrap());
        assert_eq!(core.storage.users.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeat_contact_reuses_record() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let (app, core, _tmp) = test_app(&mock_server.uri(), 5).await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(relay_request(
                    r#"{"phoneNumber": "+1555", "message": "hi"}"#,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(core.storage.users.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_slow_agent_returns_504() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("too late")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let (app, _core, _tmp) = test_app(&mock_server.uri(), 1).await;

        let response = app
            .oneshot(relay_request(
                r#"{"phoneNumber": "+1555", "message": "hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Agent service timeout");
    }

    #[tokio::test]
    async fn test_agent_error_status_returns_502() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("agent exploded"))
            .mount(&mock_server)
            .await;

        let (app, _core, _tmp) = test_app(&mock_server.uri(), 5).await;

        let response = app
            .oneshot(relay_request(
                r#"{"phoneNumber": "+1555", "message": "hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Agent service error: agent exploded");
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_before_any_work() {
        let mock_server = MockServer::start().await;
        // The relay must never be called for rejected input.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (app, core, _tmp) = test_app(&mock_server.uri(), 5).await;

        for body in [
            r#"{"phoneNumber": "  ", "message": "hello"}"#,
            r#"{"phoneNumber": "+1555", "message": ""}"#,
        ] {
            let response = app.clone().oneshot(relay_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert!(json["detail"].is_string());
        }

        assert_eq!(core.storage.users.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_agent_returns_502_after_user_created() {
        // Directory step still completes; only the relay step fails.
        let (app, core, _tmp) = test_app("http://127.0.0.1:9", 2).await;

        let response = app
            .oneshot(relay_request(
                r#"{"phoneNumber": "+1555", "message": "hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(core.storage.users.exists("+1555").unwrap());
    }
}
