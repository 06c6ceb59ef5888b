use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::shared::utils::lenient_string;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

/// Proposal to hand a lead over to an employee. `status` is free text: any
/// value may replace any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Lead identifier as the client sent it: number, string or null.
    #[serde(default)]
    pub lead_id: Option<Value>,
    /// Display name of the assignee at the time of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_name: String,
    #[serde(default)]
    pub lead_details: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_via: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransferRequest {
    pub fn new(id: impl Into<String>, lead_name: impl Into<String>, assigned_to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lead_id: None,
            name: None,
            lead_name: lead_name.into(),
            lead_details: None,
            assigned_to: assigned_to.into(),
            requested_by: None,
            sent_via: None,
            status: default_status(),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    fn has_status(&self, wanted: &str) -> bool {
        self.status.trim().eq_ignore_ascii_case(wanted)
    }

    pub fn is_pending(&self) -> bool {
        self.has_status(STATUS_PENDING)
    }

    pub fn is_approved(&self) -> bool {
        self.has_status(STATUS_APPROVED)
    }

    /// Fill in the identifier and timestamps a client may leave out.
    pub fn with_defaults(mut self, now: DateTime<Utc>) -> Self {
        if self.id.is_empty() {
            self.id = format!("req_{}", now.timestamp_millis());
        }
        self.created_at.get_or_insert(now);
        self.updated_at.get_or_insert(now);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequestStatus {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<String>,
}

/// Pending requests, newest first.
pub fn pending_feed(requests: Vec<TransferRequest>) -> Vec<TransferRequest> {
    let mut pending: Vec<TransferRequest> = requests.into_iter().filter(|r| r.is_pending()).collect();
    pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    pending
}
