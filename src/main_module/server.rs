//! HTTP server initialization and routing

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::activities::configure_activities_routes;
use crate::core::config::ServerConfig;
use crate::core::shared::state::AppState;
use crate::employees::configure_employees_routes;
use crate::leads::configure_leads_routes;
use crate::requests::configure_requests_routes;
use crate::tasks::configure_tasks_routes;

use super::{health_check, shutdown_signal};

pub fn create_cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = create_cors_layer(&app_state.config.server);

    Router::new()
        .route("/health", get(health_check))
        .merge(configure_leads_routes())
        .merge(configure_employees_routes())
        .merge(configure_requests_routes())
        .merge(configure_tasks_routes())
        .merge(configure_activities_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run_axum_server(app_state: Arc<AppState>) -> std::io::Result<()> {
    let server = &app_state.config.server;
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let app = build_router(app_state.clone());

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {} - is another instance running?", addr, e);
            return Err(e);
        }
    };
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(std::io::Error::other)
}
