//! Normalization of oracle answers into the public result schema

use crate::oracle::OracleResponse;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Oracle messages that confirm the mailbox accepts mail
pub const DELIVERABLE_MESSAGES: [&str; 2] = ["Accepted", "Limited"];

/// Output message for any deliverable oracle answer
pub const DELIVERABLE: &str = "deliverable";

pub fn is_deliverable_message(message: &str) -> bool {
    DELIVERABLE_MESSAGES.contains(&message)
}

/// Mailbox status derived from the oracle `code` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MailboxStatus {
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "not_found")]
    NotFound,
    /// Missing or unrecognized code, serialized as an empty string
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl MailboxStatus {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ok") => MailboxStatus::Valid,
            Some("ko") | Some("mb") => MailboxStatus::NotFound,
            _ => MailboxStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MailboxStatus::Valid => "valid",
            MailboxStatus::NotFound => "not_found",
            MailboxStatus::Unknown => "",
        }
    }
}

/// Final verification record returned for a request
///
/// Field declaration order is the serialized order and is part of the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Confirmed address; empty unless the oracle reported it deliverable
    pub email: String,
    pub status: MailboxStatus,
    pub message: String,
    pub user_name: String,
    pub domain: String,
    pub mx: String,
    pub connections: u64,
    /// Oracle queries attempted, failed ones included
    pub ver_ops: u32,
    /// Wall-clock seconds spent on the whole request
    pub time_exec: f64,
}

impl VerificationResult {
    /// Normalize one raw oracle answer
    pub fn from_response(raw: OracleResponse) -> Self {
        let deliverable = is_deliverable_message(raw.message());

        let message = if deliverable {
            DELIVERABLE.to_string()
        } else {
            raw.message.unwrap_or_default()
        };

        let email = if deliverable {
            raw.email.unwrap_or_default()
        } else {
            String::new()
        };

        Self {
            email,
            status: MailboxStatus::from_code(raw.code.as_deref()),
            message,
            user_name: raw.user.unwrap_or_default(),
            domain: raw.domain.unwrap_or_default(),
            mx: raw.mx.unwrap_or_default(),
            connections: raw.connections.unwrap_or_default(),
            ver_ops: 0,
            time_exec: 0.0,
        }
    }

    pub fn with_ver_ops(mut self, ver_ops: u32) -> Self {
        self.ver_ops = ver_ops;
        self
    }

    pub fn with_time_exec(mut self, elapsed: Duration) -> Self {
        self.time_exec = elapsed.as_secs_f64();
        self
    }

    pub fn is_deliverable(&self) -> bool {
        self.message == DELIVERABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(message: &str, code: &str) -> OracleResponse {
        OracleResponse {
            message: Some(message.to_string()),
            code: Some(code.to_string()),
            email: Some("john.smith@example.com".to_string()),
            user: Some("john.smith".to_string()),
            domain: Some("example.com".to_string()),
            mx: Some("mx1.example.com".to_string()),
            connections: Some(2),
        }
    }

    #[test]
    fn test_deliverable_messages_collapse() {
        for message in ["Accepted", "Limited"] {
            let result = VerificationResult::from_response(response(message, "ok"));
            assert_eq!(result.message, "deliverable");
            assert_eq!(result.email, "john.smith@example.com");
            assert_eq!(result.status, MailboxStatus::Valid);
            assert!(result.is_deliverable());
        }
    }

    #[test]
    fn test_non_deliverable_hides_email() {
        for message in ["Rejected", "Catch-All", "No MX", "Timeout", "Something New"] {
            let result = VerificationResult::from_response(response(message, "ko"));
            assert_eq!(result.email, "");
            assert_eq!(result.message, message);
            assert!(!result.is_deliverable());
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(MailboxStatus::from_code(Some("ok")), MailboxStatus::Valid);
        assert_eq!(MailboxStatus::from_code(Some("ko")), MailboxStatus::NotFound);
        assert_eq!(MailboxStatus::from_code(Some("mb")), MailboxStatus::NotFound);
        assert_eq!(MailboxStatus::from_code(Some("OK")), MailboxStatus::Unknown);
        assert_eq!(MailboxStatus::from_code(None), MailboxStatus::Unknown);
    }

    #[test]
    fn test_missing_fields_default() {
        let result = VerificationResult::from_response(OracleResponse::default());
        assert_eq!(result, VerificationResult::default());
        assert_eq!(result.status.as_str(), "");
    }

    #[test]
    fn test_pass_through_fields() {
        let result = VerificationResult::from_response(response("Catch-All", "mb"))
            .with_ver_ops(4)
            .with_time_exec(Duration::from_millis(1500));

        assert_eq!(result.user_name, "john.smith");
        assert_eq!(result.domain, "example.com");
        assert_eq!(result.mx, "mx1.example.com");
        assert_eq!(result.connections, 2);
        assert_eq!(result.ver_ops, 4);
        assert_eq!(result.time_exec, 1.5);
    }

    #[test]
    fn test_serialized_field_order() {
        let result = VerificationResult::from_response(response("Accepted", "ok"));
        let json = serde_json::to_string(&result).unwrap();

        let keys = [
            "\"email\"",
            "\"status\"",
            "\"message\"",
            "\"user_name\"",
            "\"domain\"",
            "\"mx\"",
            "\"connections\"",
            "\"ver_ops\"",
            "\"time_exec\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(!json.contains("\"code\""));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(VerificationResult::default()).unwrap();
        assert_eq!(json["status"], "");

        let rejected = VerificationResult::from_response(response("Rejected", "ko"));
        let json = serde_json::to_value(rejected).unwrap();
        assert_eq!(json["status"], "not_found");
    }
}
