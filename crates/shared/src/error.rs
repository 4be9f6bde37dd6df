use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on 4xx/5xx responses.
///
/// The backend answers either `{"detail": "..."}`, `{"message": "..."}` or,
/// for request validation failures, `{"detail": [{"msg": "...", ...}]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Human-readable text carried by the body, if any.
    pub fn text(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.trim().is_empty() => {
                return Some(detail.clone());
            }
            Some(Value::Array(entries)) => {
                let joined = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }

        self.message
            .as_ref()
            .filter(|message| !message.trim().is_empty())
            .cloned()
    }
}
