pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub use handlers::*;
pub use types::*;

pub fn configure_requests_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/requests",
            get(handle_list_requests).put(handle_update_request_status),
        )
        .route("/api/requests/pending", get(handle_pending_requests))
        .route("/api/transferLead", post(handle_create_transfer))
}
