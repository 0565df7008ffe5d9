use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use super::api::{create_api_router, healthz, AppState};
use crate::orchestrator::Orchestrator;

pub async fn start_web_server(orchestrator: Arc<Mutex<Orchestrator>>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState { orchestrator };

    let api_router = create_api_router(state);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_router)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("web status server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {}", e).into())
}
