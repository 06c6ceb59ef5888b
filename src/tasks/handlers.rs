use axum::{extract::State, Json};
use chrono::Utc;
use log::info;
use serde_json::Value;
use std::sync::Arc;

use crate::core::shared::error::{CrmError, CrmResult};
use crate::core::shared::extract::ApiJson;
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;

use super::sync::{sync_approved_requests, SyncReport};
use super::types::{merge_new_tasks, Task, UpdateTaskStatus};

pub async fn handle_list_tasks(State(state): State<Arc<AppState>>) -> CrmResult<Json<Vec<Task>>> {
    let store = state.store.clone();
    let tasks = run_blocking(move || store.tasks.load()).await?;
    Ok(Json(tasks))
}

pub async fn handle_insert_tasks(
    State(state): State<Arc<AppState>>,
    ApiJson(incoming): ApiJson<Vec<Task>>,
) -> CrmResult<Json<Value>> {
    let store = state.store.clone();
    let inserted = run_blocking(move || store.tasks.modify(|tasks| Ok(merge_new_tasks(tasks, incoming)))).await?;

    if inserted > 0 {
        info!("Inserted {inserted} new task(s)");
    }
    Ok(Json(serde_json::json!({ "success": true, "inserted": inserted })))
}

pub async fn handle_update_task_status(
    State(state): State<Arc<AppState>>,
    ApiJson(update): ApiJson<UpdateTaskStatus>,
) -> CrmResult<Json<Value>> {
    let store = state.store.clone();
    let updated = run_blocking(move || {
        store.tasks.modify(|tasks| {
            let slot = tasks
                .iter_mut()
                .find(|t| t.id() == update.id)
                .ok_or_else(|| CrmError::not_found("Task not found"))?;
            slot.task_status = update.task_status;
            slot.request.updated_at = Some(Utc::now());
            Ok(slot.clone())
        })
    })
    .await?;

    info!("Task {} is now {}", updated.id(), updated.task_status);
    Ok(Json(serde_json::json!({ "success": true, "updated": updated })))
}

pub async fn handle_sync_tasks(State(state): State<Arc<AppState>>) -> CrmResult<Json<SyncReport>> {
    let store = state.store.clone();
    let report = run_blocking(move || sync_approved_requests(&store)).await?;
    Ok(Json(report))
}
