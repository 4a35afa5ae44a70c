//! HTTP surface of the follow-up service
//!
//! ```text
//! GET  /           → {"status": "ok", "service": "claritycheck-ai"}
//! POST /followups  → {"questions": [...]}
//! ```
//!
//! The request body is parsed by hand so a bad profile shape becomes a 422
//! with a JSON error instead of axum's plain-text rejection.

use crate::followups::FollowupEngine;
use crate::types::FollowupRequest;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FollowupEngine>,
}

pub fn create_router(engine: Arc<FollowupEngine>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/followups", post(followups))
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine })
}

/// Bind and serve until the process is stopped
pub async fn serve(engine: Arc<FollowupEngine>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}/followups", listener.local_addr()?);
    axum::serve(listener, create_router(engine)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "claritycheck-ai"}))
}

async fn followups(State(state): State<AppState>, body: String) -> Response {
    let request: FollowupRequest = if body.trim().is_empty() {
        FollowupRequest::default()
    } else {
        match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejected follow-up request");
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response();
            }
        }
    };

    Json(state.engine.respond(&request).await).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FollowupConfig;
    use crate::generator::{DisabledGenerator, StaticGenerator};
    use crate::types::FollowupsResponse;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router(target_count: usize) -> Router {
        let engine = FollowupEngine::new(
            Arc::new(StaticGenerator::new(["Is the serum dermatologically tested?"])),
            FollowupConfig {
                target_count,
                ..Default::default()
            },
        );
        create_router(Arc::new(engine))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_followups(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/followups")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(3)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_followups_returns_questions() {
        let response = router(3)
            .oneshot(post_followups(
                r#"{"product": {"category": "face serum"}, "profile": {"actives": ["niacinamide"]}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let parsed: FollowupsResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(parsed.questions.len(), 3);
        assert_eq!(parsed.questions[0].text, "Is the serum dermatologically tested?");
        assert_eq!(parsed.questions[2].id, "q3");
    }

    #[tokio::test]
    async fn test_followups_accepts_empty_and_null_bodies() {
        for body in ["", "{}", r#"{"product": null, "profile": null}"#] {
            let response = router(2).oneshot(post_followups(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "body {:?}", body);
            assert_eq!(body_json(response).await["questions"].as_array().unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn test_followups_rejects_bad_profile_shape() {
        let response = router(2)
            .oneshot(post_followups(r#"{"product": {}, "profile": ["not", "a", "map"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("Invalid profile shape"), "{}", error);
    }

    #[tokio::test]
    async fn test_followups_rejects_malformed_json() {
        let engine = FollowupEngine::new(Arc::new(DisabledGenerator), FollowupConfig::default());
        let response = create_router(Arc::new(engine))
            .oneshot(post_followups("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
