use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::orchestrator::Orchestrator;
use crate::vessel::VesselSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Mutex<Orchestrator>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
        }
    }

    #[allow(dead_code)]
    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BridgeTextResponse {
    pub bridge_text: String,
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn get_status(State(state): State<AppState>) -> Json<ApiResponse<BridgeTextResponse>> {
    let orchestrator = state.orchestrator.lock().await;
    let bridge_text = orchestrator.current_bridge_text().to_string();
    info!(%bridge_text, "GET /api/status called");
    Json(ApiResponse::ok(BridgeTextResponse { bridge_text }))
}

pub async fn get_vessels(State(state): State<AppState>) -> Json<ApiResponse<Vec<VesselSnapshot>>> {
    let orchestrator = state.orchestrator.lock().await;
    let vessels = orchestrator.vessels();
    info!(count = vessels.len(), "GET /api/vessels called");
    Json(ApiResponse::ok(vessels))
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/vessels", get(get_vessels))
        .with_state(state)
}
