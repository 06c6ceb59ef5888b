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

pub fn configure_employees_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/employees",
            get(handle_list_employees).post(handle_create_employee),
        )
        .route(
            "/api/employees/:id",
            put(handle_update_employee).delete(handle_delete_employee),
        )
}
