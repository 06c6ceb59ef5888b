pub mod handlers;
pub mod types;

use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub use handlers::*;
pub use types::*;

pub fn configure_leads_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/customers", get(handle_list_leads).post(handle_create_lead))
        .route(
            "/api/customers/:id",
            put(handle_update_lead).delete(handle_delete_lead),
        )
}
