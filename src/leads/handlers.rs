use axum::{
    extract::State,
    Json,
};
use chrono::Utc;
use log::info;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::shared::error::{CrmError, CrmResult};
use crate::core::shared::extract::{ApiJson, ApiPath, ApiQuery};
use crate::core::shared::state::AppState;
use crate::core::shared::store::merge_patch;
use crate::core::shared::utils::{now_millis, run_blocking};

use super::types::{Lead, ListLeadsQuery};

pub async fn handle_list_leads(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListLeadsQuery>,
) -> CrmResult<Json<Vec<Lead>>> {
    let store = state.store.clone();
    let leads = run_blocking(move || store.leads.load()).await?;
    Ok(Json(query.apply(leads)))
}

/// New leads go to the front of the file. No validation beyond the JSON shape.
pub async fn handle_create_lead(
    State(state): State<Arc<AppState>>,
    ApiJson(mut lead): ApiJson<Lead>,
) -> CrmResult<Json<Lead>> {
    if lead.id == 0 {
        lead.id = now_millis();
    }
    if lead.created_at.is_none() {
        lead.created_at = Some(Utc::now());
    }

    let store = state.store.clone();
    let saved = lead.clone();
    run_blocking(move || {
        store.leads.modify(|leads| {
            leads.insert(0, saved);
            Ok(())
        })
    })
    .await?;

    info!("Created lead {} ({})", lead.id, lead.name);
    Ok(Json(lead))
}

pub async fn handle_update_lead(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> CrmResult<Json<Lead>> {
    let store = state.store.clone();
    let updated = run_blocking(move || {
        store.leads.modify(|leads| {
            let slot = leads
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or_else(|| CrmError::not_found("Not found"))?;
            *slot = merge_patch(&*slot, &patch)?;
            Ok(slot.clone())
        })
    })
    .await?;

    Ok(Json(updated))
}

pub async fn handle_delete_lead(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> CrmResult<Json<Value>> {
    let store = state.store.clone();
    let removed = run_blocking(move || {
        store.leads.modify(|leads| {
            let before = leads.len();
            leads.retain(|l| l.id != id);
            Ok(before - leads.len())
        })
    })
    .await?;

    if removed > 0 {
        info!("Deleted lead {id}");
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
