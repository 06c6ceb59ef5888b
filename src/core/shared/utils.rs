use chrono::Utc;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::error::CrmResult;

/// Run blocking file work off the async executor.
pub async fn run_blocking<R, F>(f: F) -> CrmResult<R>
where
    F: FnOnce() -> CrmResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Milliseconds since the Unix epoch, used to mint record identifiers.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Case-insensitive substring match; an empty needle matches everything.
pub fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || haystack
            .map(|h| h.to_lowercase().contains(needle_lower))
            .unwrap_or(false)
}

/// Reads a text field the way loosely typed clients write it: `null` becomes
/// an empty string and numbers or booleans keep their JSON spelling.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("expected text, found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "lenient_string")]
        name: String,
    }

    #[test]
    fn test_lenient_string() {
        let parse = |v: Value| serde_json::from_value::<Named>(v).map(|n| n.name);
        assert_eq!(parse(json!({"name": null})).ok().as_deref(), Some(""));
        assert_eq!(parse(json!({"name": 1717})).ok().as_deref(), Some("1717"));
        assert_eq!(parse(json!({})).ok().as_deref(), Some(""));
        assert!(parse(json!({"name": ["a"]})).is_err());
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci(Some("Acme Corp"), "acme"));
        assert!(contains_ci(None, ""));
        assert!(!contains_ci(None, "acme"));
        assert!(!contains_ci(Some("Globex"), "acme"));
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_result() {
        let value = run_blocking(|| Ok(41 + 1)).await;
        assert_eq!(value.ok(), Some(42));
    }
}
