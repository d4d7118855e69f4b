//! # Trackspec Core
//!
//! Test-automation harness for REST issue-tracker APIs: a thin HTTP client,
//! a domain service for issue operations, contract validation for response
//! bodies, randomized test data, and a per-test fixture that cleans up the
//! server-side state a test creates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackspec_core::{ApiClient, Contract, TestHarness, factory};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::from_env()?;
//!
//! TestHarness::scope(client, |harness| async move {
//!     let payload = factory::issue_payload();
//!     let response = harness
//!         .create_issue("acme", "widget", &payload)
//!         .await
//!         .expect("create issue");
//!
//!     assert_eq!(response.status().as_u16(), 201);
//!
//!     let body = response.json_value().expect("json body");
//!     let contract = Contract::issue().expect("contract compiles");
//!     let verdict = contract.validate(&body);
//!     assert!(verdict.pass, "{}", verdict.diagnostic);
//! })
//! .await;
//! // every issue created inside the scope has been closed again
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`ApiClient`] — five HTTP verbs against a fixed base URL with bearer
//!   auth; returns opaque [`ApiResponse`] values, never errors on status.
//! - [`issues::IssueService`] — endpoint construction and payload shapes
//!   for the issue domain.
//! - [`TestHarness`] / [`fixture::RecordingIssueService`] — per-test
//!   dependency wiring with creation tracking and reverse-order teardown.
//! - [`Contract`] — JSON Schema contracts with tree-shaped failure
//!   diagnostics.
//! - [`factory`] — collision-resistant randomized payloads.
//! - [`logging`] — console plus rotating `combined.log` / `error.log`
//!   sinks, level-controlled by `TRACKSPEC_LOG`.
//!
//! ## Error Handling
//!
//! Non-success HTTP statuses are data, not errors: inspect
//! [`ApiResponse::status`] / [`ApiResponse::is_ok`]. Only transport
//! faults, configuration mistakes, and decode failures surface as
//! [`ApiClientError`].

mod client;

mod config;

pub mod contract;
pub mod factory;
pub mod fixture;
pub mod issues;
pub mod logging;

pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, ApiResponse, Authentication, AuthenticationError,
    SecureString,
};
pub use self::config::HarnessConfig;
pub use self::contract::{Contract, ContractError, Verdict};
pub use self::fixture::{TestHarness, TrackedIssue};
pub use self::issues::{IssuePatch, IssuePayload, IssueState};
