//! Reconciliation of approved transfer requests into the task collection.
//!
//! Best effort and at-most-once per pass: a request is turned into a task only
//! if no task carries its id yet, so repeated passes never duplicate.

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::core::shared::error::CrmResult;
use crate::core::shared::state::{AppState, CrmStore};
use crate::core::shared::utils::run_blocking;
use crate::requests::TransferRequest;

use super::types::{merge_new_tasks, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub approved: usize,
    pub inserted: usize,
}

/// Approved requests that have no task yet, converted to `in-process` tasks.
pub fn pending_tasks(requests: &[TransferRequest], tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let existing: HashSet<&str> = tasks.iter().map(Task::id).collect();
    requests
        .iter()
        .filter(|r| r.is_approved() && !existing.contains(r.id.as_str()))
        .cloned()
        .map(|r| Task::from_request(r, now))
        .collect()
}

pub fn sync_approved_requests(store: &CrmStore) -> CrmResult<SyncReport> {
    let requests = store.requests.load()?;
    let approved = requests.iter().filter(|r| r.is_approved()).count();

    let now = Utc::now();
    if pending_tasks(&requests, &store.tasks.load()?, now).is_empty() {
        return Ok(SyncReport { approved, inserted: 0 });
    }

    let inserted = store.tasks.modify(|tasks| {
        let fresh = pending_tasks(&requests, tasks, now);
        Ok(merge_new_tasks(tasks, fresh))
    })?;

    if inserted > 0 {
        info!("Sync added {inserted} new task(s) from approved requests");
    }
    Ok(SyncReport { approved, inserted })
}

/// Run a sync pass every `interval` until the runtime shuts down.
pub fn spawn_sync_poller(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    info!("Starting request sync every {}s", interval.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let store = state.store.clone();
            match run_blocking(move || sync_approved_requests(&store)).await {
                Ok(report) => debug!(
                    "Sync pass: {} approved, {} inserted",
                    report.approved, report.inserted
                ),
                Err(e) => error!("Request sync failed: {e}"),
            }
        }
    })
}
