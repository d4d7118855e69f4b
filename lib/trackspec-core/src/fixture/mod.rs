//! Per-test construction and teardown with automatic cleanup tracking.
//!
//! [`TestHarness::scope`] is the entry point: it builds the service stack
//! for one test, hands it to the async test body, and runs teardown on
//! every exit path — normal return, error return, or panic. Creations are
//! tracked by [`RecordingIssueService`], a decorator that wraps the real
//! [`IssueService`] instead of patching it, so both behaviors stay
//! statically visible.

use std::future::Future;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{ApiClient, ApiClientError, ApiResponse};
use crate::issues::{IssuePatch, IssuePayload, IssueService};

/// Bookkeeping record for a server-side issue created during a test.
///
/// Records exist only for creations that returned a success status; the
/// sequence they live in is private to one test's harness and is consumed
/// exactly once during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedIssue {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue number assigned by the upstream.
    pub number: u64,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    number: u64,
}

/// Issue service decorator that tracks successful creations for cleanup.
///
/// Every operation delegates to the wrapped [`IssueService`] and returns
/// its response unchanged. `create_issue` additionally peeks at successful
/// responses to record the new issue for teardown.
#[derive(Debug, Clone)]
pub struct RecordingIssueService {
    inner: IssueService,
    created: Arc<Mutex<Vec<TrackedIssue>>>,
}

impl RecordingIssueService {
    /// Wraps a service with creation tracking.
    pub fn new(inner: IssueService) -> Self {
        Self {
            inner,
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn created(&self) -> MutexGuard<'_, Vec<TrackedIssue>> {
        // The sink outlives a panicking writer; poisoning carries no
        // invariant here.
        self.created.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the currently tracked issues, in creation order.
    pub fn tracked(&self) -> Vec<TrackedIssue> {
        self.created().clone()
    }

    /// Creates an issue and tracks it when the upstream reports success.
    ///
    /// The returned response is the delegate's response, unchanged. A 2xx
    /// body without a readable `number` is logged and not tracked — there
    /// is nothing to close without a number.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        payload: &IssuePayload,
    ) -> Result<ApiResponse, ApiClientError> {
        let response = self.inner.create_issue(owner, repo, payload).await?;
        if response.is_ok() {
            match response.json::<CreatedIssue>() {
                Ok(created) => {
                    debug!(owner, repo, number = created.number, "tracking created issue");
                    self.created().push(TrackedIssue {
                        owner: owner.to_string(),
                        repo: repo.to_string(),
                        number: created.number,
                    });
                }
                Err(error) => {
                    warn!(%error, "created issue has no readable number, skipping cleanup tracking");
                }
            }
        }
        Ok(response)
    }

    /// See [`IssueService::list_issues`].
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn list_issues(&self, owner: &str, repo: &str) -> Result<ApiResponse, ApiClientError> {
        self.inner.list_issues(owner, repo).await
    }

    /// See [`IssueService::get_issue`].
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn get_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.inner.get_issue(owner, repo, number).await
    }

    /// See [`IssueService::update_issue`].
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        patch: &IssuePatch,
    ) -> Result<ApiResponse, ApiClientError> {
        self.inner.update_issue(owner, repo, number, patch).await
    }

    /// See [`IssueService::close_issue`].
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn close_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.inner.close_issue(owner, repo, number).await
    }

    /// See [`IssueService::reopen_issue`].
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClientError`] from the wrapped service.
    pub async fn reopen_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ApiResponse, ApiClientError> {
        self.inner.reopen_issue(owner, repo, number).await
    }

    /// Closes every tracked issue, most recently created first.
    ///
    /// The tracked sequence is consumed up front, so calling this twice
    /// closes each issue at most once. A failing close (bad status or
    /// transport fault) is logged and does not stop the remaining
    /// cleanups; there is no retry.
    pub async fn teardown(&self) {
        let tracked = mem::take(&mut *self.created());
        for issue in tracked.iter().rev() {
            match self
                .inner
                .close_issue(&issue.owner, &issue.repo, issue.number)
                .await
            {
                Ok(response) if response.is_ok() => {
                    debug!(number = issue.number, "closed tracked issue");
                }
                Ok(response) => {
                    warn!(
                        number = issue.number,
                        status = response.status().as_u16(),
                        "cleanup close returned a non-success status"
                    );
                }
                Err(error) => {
                    warn!(number = issue.number, %error, "cleanup close failed");
                }
            }
        }
    }
}

/// Per-test dependency container.
///
/// Dereferences to [`RecordingIssueService`], so tests call issue
/// operations directly on the harness — mirroring how the service would be
/// used without the fixture, just with tracking underneath.
#[derive(Debug, Clone, derive_more::Deref)]
pub struct TestHarness {
    #[deref]
    issues: RecordingIssueService,
}

impl TestHarness {
    /// Builds the harness for one test execution.
    pub fn new(client: ApiClient) -> Self {
        Self {
            issues: RecordingIssueService::new(IssueService::new(client)),
        }
    }

    /// The instrumented issue service.
    pub fn issues(&self) -> &RecordingIssueService {
        &self.issues
    }

    /// Runs a test body with a fresh harness and guaranteed teardown.
    ///
    /// Teardown runs whether the body returns normally, returns an error
    /// value, or panics; a caught panic is resumed after teardown so the
    /// host test runner still reports the failure.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use trackspec_core::{ApiClient, TestHarness, factory};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::from_env()?;
    /// TestHarness::scope(client, |harness| async move {
    ///     let payload = factory::issue_payload();
    ///     let response = harness
    ///         .create_issue("acme", "widget", &payload)
    ///         .await
    ///         .expect("create issue");
    ///     assert_eq!(response.status().as_u16(), 201);
    /// })
    /// .await;
    /// // the created issue has been closed again here
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scope<F, Fut, T>(client: ApiClient, body: F) -> T
    where
        F: FnOnce(TestHarness) -> Fut,
        Fut: Future<Output = T>,
    {
        let harness = Self::new(client);
        let cleanup = harness.issues.clone();

        let outcome = AssertUnwindSafe(body(harness)).catch_unwind().await;
        cleanup.teardown().await;

        match outcome {
            Ok(value) => value,
            Err(cause) => panic::resume_unwind(cause),
        }
    }
}
