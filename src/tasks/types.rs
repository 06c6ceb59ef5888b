//! Types for the tasks module
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::requests::TransferRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    InProcess,
    OnHold,
    Completed,
    Discuss,
    Transferred,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProcess => "in-process",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Discuss => "discuss",
            Self::Transferred => "transferred",
        };
        f.write_str(s)
    }
}

/// An approved transfer request tracked through its working lifecycle. Shares
/// the id of the request it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(flatten)]
    pub request: TransferRequest,
    #[serde(default)]
    pub task_status: TaskStatus,
}

impl Task {
    pub fn id(&self) -> &str {
        &self.request.id
    }

    pub fn from_request(request: TransferRequest, now: DateTime<Utc>) -> Self {
        let mut request = request;
        request.created_at.get_or_insert(now);
        request.updated_at.get_or_insert(now);
        Self {
            request,
            task_status: TaskStatus::InProcess,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatus {
    pub id: String,
    pub task_status: TaskStatus,
}

/// Append every incoming task whose id is not already present, forcing it to
/// `in-process`. Returns how many were appended.
pub fn merge_new_tasks(existing: &mut Vec<Task>, incoming: Vec<Task>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|t| t.id().to_string()).collect();
    let before = existing.len();

    for mut task in incoming {
        if !seen.insert(task.id().to_string()) {
            continue;
        }
        task.task_status = TaskStatus::InProcess;
        existing.push(task);
    }

    existing.len() - before
}
