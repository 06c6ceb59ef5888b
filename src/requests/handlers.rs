use axum::{
    extract::State,
    Json,
};
use chrono::Utc;
use log::info;
use serde_json::Value;
use std::sync::Arc;

use crate::core::shared::error::{CrmError, CrmResult};
use crate::core::shared::extract::{ApiJson, ApiQuery};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;

use super::types::{pending_feed, ListRequestsQuery, TransferRequest, UpdateRequestStatus};

pub async fn handle_list_requests(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListRequestsQuery>,
) -> CrmResult<Json<Vec<TransferRequest>>> {
    let store = state.store.clone();
    let mut requests = run_blocking(move || store.requests.load()).await?;
    if let Some(status) = query.status.as_deref() {
        let wanted = status.trim();
        requests.retain(|r| r.status.trim().eq_ignore_ascii_case(wanted));
    }
    Ok(Json(requests))
}

pub async fn handle_pending_requests(
    State(state): State<Arc<AppState>>,
) -> CrmResult<Json<Vec<TransferRequest>>> {
    let store = state.store.clone();
    let requests = run_blocking(move || store.requests.load()).await?;
    Ok(Json(pending_feed(requests)))
}

pub async fn handle_create_transfer(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TransferRequest>,
) -> CrmResult<Json<Value>> {
    let record = req.with_defaults(Utc::now());

    let store = state.store.clone();
    let saved = record.clone();
    run_blocking(move || {
        store.requests.modify(|requests| {
            requests.push(saved);
            Ok(())
        })
    })
    .await?;

    info!(
        "Transfer request {} for lead '{}' to employee {}",
        record.id, record.lead_name, record.assigned_to
    );
    Ok(Json(serde_json::json!({ "success": true, "data": record })))
}

pub async fn handle_update_request_status(
    State(state): State<Arc<AppState>>,
    ApiJson(update): ApiJson<UpdateRequestStatus>,
) -> CrmResult<Json<Value>> {
    let store = state.store.clone();
    let updated = run_blocking(move || {
        store.requests.modify(|requests| {
            let slot = requests
                .iter_mut()
                .find(|r| r.id == update.id)
                .ok_or_else(|| CrmError::not_found("Request not found"))?;
            slot.status = update.status;
            slot.updated_at = Some(Utc::now());
            Ok(slot.clone())
        })
    })
    .await?;

    info!("Request {} is now {}", updated.id, updated.status);
    Ok(Json(serde_json::json!({ "success": true, "updated": updated })))
}
