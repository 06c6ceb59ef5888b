pub mod handlers;
pub mod sync;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub use handlers::*;
pub use sync::{spawn_sync_poller, sync_approved_requests, SyncReport};
pub use types::*;

pub fn configure_tasks_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tasks",
            get(handle_list_tasks)
                .post(handle_insert_tasks)
                .put(handle_update_task_status),
        )
        .route("/api/tasks/sync", post(handle_sync_tasks))
}
