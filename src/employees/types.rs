use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::shared::utils::lenient_string;

pub const DEFAULT_EMPLOYEE_NAME: &str = "New Employee";
pub const DEFAULT_EMPLOYEE_ROLE: &str = "Staff";
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateEmployeeRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl CreateEmployeeRequest {
    /// Trimmed email, or `None` when missing or blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn into_employee(self, id: String) -> Option<Employee> {
        let email = self.email()?.to_string();
        let pick = |v: Option<String>, fallback: &str| {
            v.filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        Some(Employee {
            id,
            email,
            name: pick(self.name, DEFAULT_EMPLOYEE_NAME),
            role: pick(self.role, DEFAULT_EMPLOYEE_ROLE),
            avatar: Some(DEFAULT_AVATAR_URL.to_string()),
            extra: Map::new(),
        })
    }
}

/// Millisecond timestamp id, bumped until it does not clash with `existing`.
pub fn next_employee_id(now_ms: i64, existing: &[Employee]) -> String {
    let mut candidate = now_ms;
    while existing.iter().any(|e| e.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, name: Option<&str>, role: Option<&str>) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            email: email.map(String::from),
            name: name.map(String::from),
            role: role.map(String::from),
        }
    }

    #[test]
    fn test_blank_email_rejected() {
        assert!(request(None, Some("A"), None).into_employee("1".into()).is_none());
        assert!(request(Some("   "), Some("A"), None).into_employee("1".into()).is_none());
    }

    #[test]
    fn test_defaults_applied() {
        let emp = request(Some("  priya@example.com "), None, None)
            .into_employee("42".into())
            .expect("valid email");
        assert_eq!(emp.email, "priya@example.com");
        assert_eq!(emp.name, DEFAULT_EMPLOYEE_NAME);
        assert_eq!(emp.role, DEFAULT_EMPLOYEE_ROLE);
        assert_eq!(emp.avatar.as_deref(), Some(DEFAULT_AVATAR_URL));
    }

    #[test]
    fn test_loosely_typed_record_reads() {
        let emp: Employee = serde_json::from_value(serde_json::json!({
            "id": 1716999999999_i64,
            "name": null,
            "email": "old@example.com"
        }))
        .expect("nullable fields accepted");
        assert_eq!(emp.id, "1716999999999");
        assert_eq!(emp.name, "");
        assert_eq!(emp.role, "");
    }

    #[test]
    fn test_next_id_skips_taken() {
        let taken = request(Some("a@b.c"), None, None)
            .into_employee("1000".into())
            .expect("valid email");
        assert_eq!(next_employee_id(1000, &[taken]), "1001");
        assert_eq!(next_employee_id(5, &[]), "5");
    }
}
