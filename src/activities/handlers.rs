use axum::{
    extract::State,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::core::shared::error::CrmResult;
use crate::core::shared::extract::ApiQuery;
use crate::core::shared::state::{AppState, CrmStore};
use crate::core::shared::utils::run_blocking;

use super::report::{build_activities, summarize, Activity, ActivityQuery, ActivitySummary};

fn load_activities(store: &CrmStore) -> CrmResult<Vec<Activity>> {
    let employees = store.employees.load()?;
    let tasks = store.tasks.load()?;
    Ok(build_activities(&tasks, &employees, Utc::now()))
}

pub async fn handle_list_activities(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> CrmResult<Json<Vec<Activity>>> {
    let store = state.store.clone();
    let activities = run_blocking(move || load_activities(&store)).await?;
    Ok(Json(query.apply(activities)))
}

pub async fn handle_activity_summary(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> CrmResult<Json<Vec<ActivitySummary>>> {
    let store = state.store.clone();
    let activities = run_blocking(move || load_activities(&store)).await?;
    Ok(Json(summarize(&query.apply(activities))))
}

#[cfg(feature = "export")]
pub async fn handle_export_activities(
    State(state): State<Arc<AppState>>,
) -> CrmResult<impl axum::response::IntoResponse> {
    use crate::core::shared::error::CrmError;
    use axum::http::header;

    let store = state.store.clone();
    let activities = run_blocking(move || load_activities(&store)).await?;
    let body = super::report::to_csv(&activities).map_err(CrmError::Internal)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"Employee_Tasks.csv\"",
            ),
        ],
        body,
    ))
}
