use serde::{Deserialize, Serialize};

/// Issue lifecycle state as the upstream API reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    #[display("open")]
    Open,
    /// The issue is closed.
    #[display("closed")]
    Closed,
}

/// Payload for creating an issue.
///
/// Only `title` is required; unset optional fields are omitted from the
/// serialized body entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    /// Issue title.
    pub title: String,
    /// Issue body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Logins to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    /// Milestone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    /// Label names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl IssuePayload {
    /// Creates a payload with the given title and nothing else set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            assignees: None,
            milestone: None,
            labels: None,
        }
    }
}

/// Partial update for an existing issue; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Replacement assignee list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    /// New milestone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    /// Replacement label list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// State transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_omits_unset_fields() {
        let payload = IssuePayload::new("Flaky pagination");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"title": "Flaky pagination"}));
    }

    #[test]
    fn payload_serializes_set_fields() {
        let payload = IssuePayload {
            title: "Flaky pagination".to_string(),
            body: Some("Repro steps".to_string()),
            assignees: None,
            milestone: Some(3),
            labels: Some(vec!["bug".to_string()]),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Flaky pagination",
                "body": "Repro steps",
                "milestone": 3,
                "labels": ["bug"],
            })
        );
    }

    #[test]
    fn patch_default_is_empty_object() {
        let patch = IssuePatch::default();
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = IssuePatch {
            body: Some("Updated".to_string()),
            state: Some(IssueState::Closed),
            ..IssuePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"body": "Updated", "state": "closed"}));
    }

    #[test]
    fn state_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&IssueState::Open).unwrap(), "\"open\"");
        let state: IssueState = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(state, IssueState::Closed);
    }
}
