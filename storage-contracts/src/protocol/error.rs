// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Status value the API uses for a successful mutation.
pub const STATUS_SUCCESS: &str = "success";

/// Structured result of a mutating request: `{ "status": ..., "message": ... }`.
///
/// Any status other than `"success"` is a failure the operator can act on,
/// whatever the transport-level status code was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResult {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Message to show for a failed result, falling back to the raw status.
    pub fn failure_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("operation failed with status '{}'", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_body_from_read_only_server_parses() {
        let json = r#"{"status":"error","message":"Partition creation is disabled in read-only mode."}"#;
        let parsed: OperationResult = serde_json::from_str(json).expect("deserialize result");

        assert!(!parsed.is_success());
        assert_eq!(
            parsed.failure_message(),
            "Partition creation is disabled in read-only mode."
        );
    }

    #[test]
    fn success_needs_no_message() {
        let parsed: OperationResult =
            serde_json::from_str(r#"{"status":"success"}"#).expect("deserialize result");
        assert_eq!(parsed, OperationResult::success());
    }

    #[test]
    fn unexpected_status_without_message_still_reports() {
        let parsed: OperationResult =
            serde_json::from_str(r#"{"status":"failed"}"#).expect("deserialize result");
        assert!(!parsed.is_success());
        assert!(parsed.failure_message().contains("failed"));
    }
}
