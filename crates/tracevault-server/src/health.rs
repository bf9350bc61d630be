use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

const UNAVAILABLE: u8 = 0;
const READY: u8 = 1;
const STOPPED: u8 = 2;

/// Shared collector health state, reported by the admin endpoint.
///
/// Starts unavailable, transitions to ready once every front-end is
/// listening, and back to unavailable on a fatal serve error.
#[derive(Clone, Default)]
pub struct HealthCheck {
    state: Arc<AtomicU8>,
}

impl HealthCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self) {
        self.state.store(READY, Ordering::Release);
    }

    pub fn set_unavailable(&self) {
        self.state.store(UNAVAILABLE, Ordering::Release);
    }

    pub fn set_stopped(&self) {
        self.state.store(STOPPED, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    pub fn status(&self) -> &'static str {
        match self.state.load(Ordering::Acquire) {
            READY => "ready",
            STOPPED => "stopped",
            _ => "unavailable",
        }
    }
}

/// Admin router: `GET /` is the listener sanity check, `GET /status` reports
/// the state machine.
pub fn admin_router(health: HealthCheck) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/status", get(status))
        .with_state(health)
}

async fn root(State(health): State<HealthCheck>) -> impl IntoResponse {
    if health.is_ready() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn status(State(health): State<HealthCheck>) -> impl IntoResponse {
    let code = if health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(json!({ "status": health.status() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn status_follows_state_machine() {
        let health = HealthCheck::new();
        assert_eq!(health.status(), "unavailable");
        health.set_ready();
        assert!(health.is_ready());
        health.set_unavailable();
        assert_eq!(health.status(), "unavailable");
        health.set_stopped();
        assert_eq!(health.status(), "stopped");
    }

    #[tokio::test]
    async fn admin_endpoint_reflects_readiness() {
        let health = HealthCheck::new();
        let app = admin_router(health.clone());

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.set_ready();
        let response = app
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
