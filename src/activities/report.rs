//! Activity report over completed tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::shared::utils::contains_ci;
use crate::employees::Employee;
use crate::tasks::{Task, TaskStatus};

pub const UNNAMED_TASK: &str = "Unnamed Task";
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub employee_name: String,
    /// `May 2024` style label used for grouping.
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub month: String,
    pub employee: String,
    pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub search: Option<String>,
    pub month: Option<String>,
}

pub fn month_label(at: DateTime<Utc>) -> String {
    at.format("%b %Y").to_string()
}

/// Completed tasks joined with the name of the assigned employee.
pub fn build_activities(tasks: &[Task], employees: &[Employee], now: DateTime<Utc>) -> Vec<Activity> {
    let names: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    tasks
        .iter()
        .filter(|t| t.task_status == TaskStatus::Completed)
        .map(|t| {
            let req = &t.request;
            let created_at = req.created_at.unwrap_or(now);
            let subject = if req.lead_name.is_empty() {
                UNNAMED_TASK.to_string()
            } else {
                req.lead_name.clone()
            };
            Activity {
                id: req.id.clone(),
                subject,
                description: req.lead_details.clone().unwrap_or_default(),
                status: TaskStatus::Completed.to_string(),
                created_at,
                employee_name: names
                    .get(req.assigned_to.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_EMPLOYEE)
                    .to_string(),
                month: month_label(created_at),
            }
        })
        .collect()
}

impl ActivityQuery {
    /// Filter by subject/employee substring and exact month ("All" or absent
    /// matches every month), newest first.
    pub fn apply(&self, activities: Vec<Activity>) -> Vec<Activity> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        let month = self.month.as_deref().filter(|m| *m != "All");

        let mut out: Vec<Activity> = activities
            .into_iter()
            .filter(|a| {
                contains_ci(Some(a.subject.as_str()), &needle)
                    || contains_ci(Some(a.employee_name.as_str()), &needle)
            })
            .filter(|a| month.map_or(true, |m| a.month == m))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

/// Counts per (month, employee) in order of first appearance.
pub fn summarize(activities: &[Activity]) -> Vec<ActivitySummary> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<ActivitySummary> = Vec::new();

    for act in activities {
        let key = (act.month.as_str(), act.employee_name.as_str());
        match index.get(&key) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(key, out.len());
                out.push(ActivitySummary {
                    month: act.month.clone(),
                    employee: act.employee_name.clone(),
                    count: 1,
                });
            }
        }
    }
    out
}

#[cfg(feature = "export")]
pub fn to_csv(activities: &[Activity]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(["ID", "Subject", "Employee", "Month", "Date"])
        .map_err(|e| e.to_string())?;
    for act in activities {
        writer
            .write_record([
                act.id.as_str(),
                act.subject.as_str(),
                act.employee_name.as_str(),
                act.month.as_str(),
                act.created_at.format("%d %b %Y").to_string().as_str(),
            ])
            .map_err(|e| e.to_string())?;
    }
    writer.into_inner().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::TransferRequest;
    use chrono::TimeZone;
    use serde_json::Map;

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            role: "Staff".to_string(),
            email: format!("{id}@example.com"),
            avatar: None,
            extra: Map::new(),
        }
    }

    fn task(id: &str, lead: &str, assignee: &str, status: TaskStatus, month: u32) -> Task {
        let mut req = TransferRequest::new(id, lead, assignee);
        req.created_at = Utc.with_ymd_and_hms(2024, month, 10, 8, 0, 0).single();
        Task {
            request: req,
            task_status: status,
        }
    }

    fn sample() -> Vec<Activity> {
        let employees = vec![employee("e1", "Meera"), employee("e2", "Tom")];
        let tasks = vec![
            task("t1", "Acme renewal", "e1", TaskStatus::Completed, 4),
            task("t2", "Globex", "e2", TaskStatus::InProcess, 4),
            task("t3", "", "e2", TaskStatus::Completed, 5),
            task("t4", "Initech", "ghost", TaskStatus::Completed, 5),
            task("t5", "Hooli", "e1", TaskStatus::Completed, 4),
        ];
        build_activities(&tasks, &employees, Utc::now())
    }

    #[test]
    fn test_build_only_completed_with_names() {
        let acts = sample();
        assert_eq!(acts.len(), 4);
        assert_eq!(acts[0].employee_name, "Meera");
        assert_eq!(acts[0].month, "Apr 2024");
        assert_eq!(acts[1].subject, UNNAMED_TASK);
        assert_eq!(acts[2].employee_name, UNKNOWN_EMPLOYEE);
        assert!(acts.iter().all(|a| a.status == "completed"));
    }

    #[test]
    fn test_query_by_month_and_search() {
        let by_month = ActivityQuery {
            month: Some("May 2024".to_string()),
            ..Default::default()
        }
        .apply(sample());
        assert_eq!(by_month.len(), 2);

        let by_name = ActivityQuery {
            search: Some("meera".to_string()),
            month: Some("All".to_string()),
        }
        .apply(sample());
        let ids: Vec<&str> = by_name.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"t1") && ids.contains(&"t5"));
    }

    #[test]
    fn test_summarize_groups_by_month_and_employee() {
        let summary = summarize(&sample());
        assert_eq!(
            summary,
            vec![
                ActivitySummary { month: "Apr 2024".into(), employee: "Meera".into(), count: 2 },
                ActivitySummary { month: "May 2024".into(), employee: "Tom".into(), count: 1 },
                ActivitySummary { month: "May 2024".into(), employee: UNKNOWN_EMPLOYEE.into(), count: 1 },
            ]
        );
    }

    #[cfg(feature = "export")]
    #[test]
    fn test_csv_export() {
        let bytes = to_csv(&sample()).expect("csv");
        let text = String::from_utf8(bytes).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Subject,Employee,Month,Date"));
        assert_eq!(lines.next(), Some("t1,Acme renewal,Meera,Apr 2024,10 Apr 2024"));
        assert_eq!(text.lines().count(), 5);
    }
}
