pub mod handlers;
pub mod report;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub use handlers::*;
pub use report::*;

pub fn configure_activities_routes() -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/api/activities", get(handle_list_activities))
        .route("/api/activities/summary", get(handle_activity_summary));

    #[cfg(feature = "export")]
    let router = router.route("/api/activities/export", get(handle_export_activities));

    router
}
