use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use log::info;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::shared::error::{CrmError, CrmResult};
use crate::core::shared::extract::{ApiJson, ApiPath};
use crate::core::shared::state::AppState;
use crate::core::shared::store::merge_patch;
use crate::core::shared::utils::{now_millis, run_blocking};

use super::types::{next_employee_id, CreateEmployeeRequest, Employee};

pub async fn handle_list_employees(
    State(state): State<Arc<AppState>>,
) -> CrmResult<Json<Vec<Employee>>> {
    let store = state.store.clone();
    let employees = run_blocking(move || store.employees.load()).await?;
    Ok(Json(employees))
}

pub async fn handle_create_employee(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateEmployeeRequest>,
) -> CrmResult<(StatusCode, Json<Employee>)> {
    if req.email().is_none() {
        return Err(CrmError::validation("Employee email is required"));
    }

    let store = state.store.clone();
    let created = run_blocking(move || {
        store.employees.modify(|employees| {
            let id = next_employee_id(now_millis(), employees);
            let employee = req
                .into_employee(id)
                .ok_or_else(|| CrmError::validation("Employee email is required"))?;
            employees.push(employee.clone());
            Ok(employee)
        })
    })
    .await?;

    info!("Created employee {} <{}>", created.id, created.email);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn handle_update_employee(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> CrmResult<Json<Employee>> {
    let store = state.store.clone();
    let updated = run_blocking(move || {
        store.employees.modify(|employees| {
            let slot = employees
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| CrmError::not_found("Employee not found"))?;
            *slot = merge_patch(&*slot, &patch)?;
            Ok(slot.clone())
        })
    })
    .await?;

    Ok(Json(updated))
}

pub async fn handle_delete_employee(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> CrmResult<Json<Value>> {
    let store = state.store.clone();
    let target = id.clone();
    run_blocking(move || {
        store.employees.modify(|employees| {
            let before = employees.len();
            employees.retain(|e| e.id != target);
            if employees.len() == before {
                return Err(CrmError::not_found("Employee not found"));
            }
            Ok(())
        })
    })
    .await?;

    info!("Deleted employee {id}");
    Ok(Json(
        serde_json::json!({ "message": "Employee deleted successfully" }),
    ))
}
