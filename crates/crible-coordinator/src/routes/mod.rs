//! Coordinator route definitions and router builder.

pub mod health;
pub mod lines;
pub mod subscribe;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/subscribe/{id}", post(subscribe::subscribe))
        .route("/subscribers", get(subscribe::list_subscribers))
        .route("/lines", get(lines::get_lines))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::fanout::SubscriberError;
    use crate::mock::{MockBehavior, MockSubscriberClient};

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn subscribe(app: &Router, id: &str) -> (StatusCode, String) {
        let (status, body) = send(
            app,
            Request::post(format!("/subscribe/{id}"))
                .body(Body::from("watcher"))
                .unwrap(),
        )
        .await;
        (status, String::from_utf8(body).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn app_with(client: MockSubscriberClient) -> (AppState, Router) {
        let state = AppState::with_mock(client, Duration::from_secs(1));
        (state.clone(), build_router(state))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (_, app) = app_with(MockSubscriberClient::new());
        let (status, json) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["subscribers"], 0);
    }

    #[tokio::test]
    async fn subscribe_acknowledges() {
        let (state, app) = app_with(MockSubscriberClient::new());
        let (status, body) = subscribe(&app, "127.0.0.1:4001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Subscribed to 127.0.0.1:4001.");
        assert_eq!(state.registry.len().await, 1);
    }

    #[tokio::test]
    async fn subscribe_twice_keeps_one_entry() {
        let (state, app) = app_with(MockSubscriberClient::new());
        assert_eq!(subscribe(&app, "127.0.0.1:4001").await.0, StatusCode::OK);
        assert_eq!(subscribe(&app, "127.0.0.1:4001").await.0, StatusCode::OK);
        assert_eq!(state.registry.len().await, 1);

        let (_, json) = get_json(&app, "/subscribers").await;
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["subscriberId"], "127.0.0.1:4001");
        assert!(entries[0]["registeredAt"].is_string());
    }

    #[tokio::test]
    async fn subscribe_rejects_malformed_id() {
        let (state, app) = app_with(MockSubscriberClient::new());
        let (status, _) = subscribe(&app, "not-a-host").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.registry.is_empty().await);
    }

    #[tokio::test]
    async fn lines_with_no_subscribers_is_empty_array() {
        let (_, app) = app_with(MockSubscriberClient::new());
        let (status, json) = get_json(&app, "/lines?filename=syslog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lines_returns_envelopes_in_registry_order() {
        let mut client = MockSubscriberClient::new();
        client.set("b.internal:3001", MockBehavior::Lines(vec!["from b".into()]));
        client.set(
            "a.internal:3001",
            MockBehavior::Fail(SubscriberError::Unreachable("connection refused".into())),
        );
        let (_, app) = app_with(client);
        subscribe(&app, "b.internal:3001").await;
        subscribe(&app, "a.internal:3001").await;

        let (status, json) = get_json(&app, "/lines?filename=syslog&filter=sshd&limit=3").await;
        assert_eq!(status, StatusCode::OK);
        let envelopes = json.as_array().unwrap();
        assert_eq!(envelopes.len(), 2);

        assert_eq!(envelopes[0]["subscriberId"], "b.internal:3001");
        assert_eq!(envelopes[0]["lines"], serde_json::json!(["from b"]));
        assert_eq!(envelopes[0]["filter"], "sshd");
        assert_eq!(envelopes[0]["limit"], 3);
        assert!(envelopes[0].get("error").is_none());

        assert_eq!(envelopes[1]["subscriberId"], "a.internal:3001");
        assert!(envelopes[1]["lines"].as_array().unwrap().is_empty());
        assert!(
            envelopes[1]["error"]
                .as_str()
                .unwrap()
                .contains("connection refused")
        );
    }

    #[tokio::test]
    async fn invalid_query_fails_before_fan_out() {
        let (state, app) = app_with(MockSubscriberClient::new());
        subscribe(&app, "127.0.0.1:4001").await;

        for uri in [
            "/lines",
            "/lines?filename=..%2Fshadow",
            "/lines?filename=syslog&limit=0",
            "/lines?filename=syslog&limit=abc",
            "/lines?filename=syslog&filter=a%20b",
            "/lines?filename=syslog&filter=",
            "/lines?filename=syslog&filename=auth.log",
        ] {
            let (status, json) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert!(json["error"].is_string());
        }
        assert_eq!(state.registry.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_query_makes_no_outbound_calls() {
        let client = std::sync::Arc::new(MockSubscriberClient::new());
        let state = AppState::new(client.clone(), Duration::from_secs(1), Default::default());
        let app = build_router(state);
        subscribe(&app, "127.0.0.1:4001").await;

        let (status, _) = get_json(&app, "/lines?filename=syslog&limit=5000").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(client.requests().is_empty());

        let (status, _) = get_json(&app, "/lines?filename=syslog&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(client.requests().len(), 1);
    }
}
