use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::shared::utils::{contains_ci, lenient_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadPriority {
    Low,
    Medium,
    High,
}

impl FromStr for LeadPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Existing,
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "existing" => Ok(Self::Existing),
            other => Err(format!("unknown lead status: {other}")),
        }
    }
}

/// A prospective or existing customer. `priority` and `status` are stored as
/// given; only the list filters interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Social platform key (whatsapp, linkedin, notion, ...) to free text.
    #[serde(default)]
    pub platforms: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contacted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company: None,
            lead_source: None,
            priority: None,
            phone: None,
            email: None,
            address: None,
            product: None,
            status: None,
            platforms: BTreeMap::new(),
            notes: None,
            last_contacted: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn parsed_priority(&self) -> Option<LeadPriority> {
        self.priority.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn parsed_status(&self) -> Option<LeadStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        [
            Some(self.name.as_str()),
            self.email.as_deref(),
            self.product.as_deref(),
            self.phone.as_deref(),
            self.address.as_deref(),
            self.company.as_deref(),
            self.lead_source.as_deref(),
        ]
        .into_iter()
        .any(|field| contains_ci(field, needle_lower))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListLeadsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl ListLeadsQuery {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none() && self.priority.is_none()
    }

    /// Apply the filters and order newest first. Unknown status or priority
    /// values match nothing.
    pub fn apply(&self, leads: Vec<Lead>) -> Vec<Lead> {
        if self.is_empty() {
            return leads;
        }

        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        let status = self.status.as_deref().map(LeadStatus::from_str);
        let priority = self.priority.as_deref().map(LeadPriority::from_str);

        let mut out: Vec<Lead> = leads
            .into_iter()
            .filter(|lead| lead.matches_search(&needle))
            .filter(|lead| match &status {
                None => true,
                Some(Ok(wanted)) => lead.parsed_status() == Some(*wanted),
                Some(Err(_)) => false,
            })
            .filter(|lead| match &priority {
                None => true,
                Some(Ok(wanted)) => lead.parsed_priority() == Some(*wanted),
                Some(Err(_)) => false,
            })
            .collect();

        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}
