//! Issue-tracker operations layered over the HTTP client.
//!
//! [`IssueService`] knows how the upstream lays out its endpoints and what
//! the request bodies look like; it deliberately does NOT interpret
//! responses. Every operation returns the raw [`ApiResponse`] so tests can
//! assert on status codes independently of payload shape.

use serde::Serialize;

use crate::client::{ApiClient, ApiClientError, ApiResponse};

mod payload;
pub use self::payload::{IssuePatch, IssuePayload, IssueState};

/// Domain service for issue operations.
#[derive(Debug, Clone)]
pub struct IssueService {
    client: ApiClient,
}

#[derive(Debug, Serialize)]
struct StateChange {
    state: IssueState,
}

impl IssueService {
    /// Creates a service over the given client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Creates an issue (`POST /repos/{owner}/{repo}/issues`).
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the client; a non-success status
    /// is NOT an error.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        payload: &IssuePayload,
    ) -> Result<ApiResponse, ApiClientError> {
        self.client
            .post(&collection_path(owner, repo), Some(payload))
            .await
    }

    /// Lists issues (`GET /repos/{owner}/{repo}/issues`).
    ///
    /// # Errors
    ///
    /// As [`create_issue`](Self::create_issue).
    pub async fn list_issues(&self, owner: &str, repo: &str) -> Result<ApiResponse, ApiClientError> {
        self.client.get(&collection_path(owner, repo)).await
    }

    /// Fetches one issue (`GET /repos/{owner}/{repo}/issues/{number}`).
    ///
    /// # Errors
    ///
    /// As [`create_issue`](Self::create_issue).
    pub async fn get_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.client.get(&item_path(owner, repo, number)).await
    }

    /// Applies a partial update (`PATCH /repos/{owner}/{repo}/issues/{number}`).
    ///
    /// # Errors
    ///
    /// As [`create_issue`](Self::create_issue).
    pub async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        patch: &IssuePatch,
    ) -> Result<ApiResponse, ApiClientError> {
        self.client
            .patch(&item_path(owner, repo, number), Some(patch))
            .await
    }

    /// Closes an issue by posting `{"state": "closed"}` to the item endpoint.
    ///
    /// # Errors
    ///
    /// As [`create_issue`](Self::create_issue).
    pub async fn close_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.set_state(owner, repo, number, IssueState::Closed).await
    }

    /// Reopens an issue by posting `{"state": "open"}` to the item endpoint.
    ///
    /// # Errors
    ///
    /// As [`create_issue`](Self::create_issue).
    pub async fn reopen_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.set_state(owner, repo, number, IssueState::Open).await
    }

    async fn set_state(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        state: IssueState,
    ) -> Result<ApiResponse, ApiClientError> {
        self.client
            .post(&item_path(owner, repo, number), Some(&StateChange { state }))
            .await
    }
}

fn collection_path(owner: &str, repo: &str) -> String {
    format!("/repos/{owner}/{repo}/issues")
}

fn item_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/{number}", collection_path(owner, repo))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn collection_path_is_deterministic() {
        assert_eq!(collection_path("o", "r"), "/repos/o/r/issues");
    }

    #[rstest]
    #[case("o", "r", 42, "/repos/o/r/issues/42")]
    #[case("acme", "widget", 1, "/repos/acme/widget/issues/1")]
    fn item_path_is_deterministic(
        #[case] owner: &str,
        #[case] repo: &str,
        #[case] number: u64,
        #[case] expected: &str,
    ) {
        assert_eq!(item_path(owner, repo, number), expected);
    }

    #[test]
    fn state_change_bodies() {
        let closed = serde_json::to_value(StateChange {
            state: IssueState::Closed,
        })
        .unwrap();
        assert_eq!(closed, serde_json::json!({"state": "closed"}));

        let open = serde_json::to_value(StateChange {
            state: IssueState::Open,
        })
        .unwrap();
        assert_eq!(open, serde_json::json!({"state": "open"}));
    }
}
