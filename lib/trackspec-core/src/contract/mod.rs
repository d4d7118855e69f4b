//! Schema-contract validation for response bodies.
//!
//! A [`Contract`] is a compiled JSON Schema describing the shape a response
//! body must have. Validation never fails with an error: it produces a
//! [`Verdict`] whose diagnostic lists every violated field path, ready to
//! be embedded in an assertion message.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use jsonschema::Validator;
use serde_json::{Value, json};

/// Placeholder diagnostic for conforming values; only ever shown when an
/// assertion is negated.
const MATCHES_CONTRACT: &str = "value matches the contract";

/// Errors that can occur when compiling a contract.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ContractError {
    /// The schema itself is invalid and cannot be compiled.
    #[display("invalid contract schema: {message}")]
    InvalidSchema {
        /// Description of the schema problem.
        message: String,
    },
}

/// Outcome of validating a value against a [`Contract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the value conforms.
    pub pass: bool,
    /// Human-readable explanation; a rendering of every violation on
    /// failure, a fixed placeholder on success.
    pub diagnostic: String,
}

/// A compiled validation contract.
pub struct Contract {
    name: &'static str,
    validator: Validator,
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract").field("name", &self.name).finish()
    }
}

impl Contract {
    /// Compiles a contract from a JSON Schema.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidSchema`] when the schema cannot be
    /// compiled.
    pub fn new(schema: &Value) -> Result<Self, ContractError> {
        Self::named("inline", schema)
    }

    fn named(name: &'static str, schema: &Value) -> Result<Self, ContractError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|err| ContractError::InvalidSchema {
                message: err.to_string(),
            })?;
        Ok(Self { name, validator })
    }

    /// The contract for a single issue response body.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidSchema`] if the built-in schema
    /// fails to compile.
    pub fn issue() -> Result<Self, ContractError> {
        Self::named("issue", &issue_schema())
    }

    /// The contract for a list-issues response body.
    ///
    /// # Errors
    ///
    /// As [`issue`](Self::issue).
    pub fn issue_list() -> Result<Self, ContractError> {
        Self::named("issue-list", &json!({"type": "array", "items": issue_schema()}))
    }

    /// Validates a value, returning a pass/fail verdict.
    ///
    /// The failure diagnostic groups every violation under its instance
    /// path (`$` for the document root). Validation itself never errors
    /// and never mutates the input.
    pub fn validate(&self, value: &Value) -> Verdict {
        let mut violations: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in self.validator.iter_errors(value) {
            let path = error.instance_path.to_string();
            let path = if path.is_empty() {
                "$".to_string()
            } else {
                path
            };
            violations.entry(path).or_default().push(error.to_string());
        }

        if violations.is_empty() {
            return Verdict {
                pass: true,
                diagnostic: MATCHES_CONTRACT.to_string(),
            };
        }

        let mut diagnostic = format!("value does not match the '{}' contract:\n", self.name);
        for (path, reasons) in &violations {
            let _ = writeln!(diagnostic, "  {path}");
            for reason in reasons {
                let _ = writeln!(diagnostic, "    - {reason}");
            }
        }
        Verdict {
            pass: false,
            diagnostic,
        }
    }
}

/// Shape the upstream issue tracker reports for a single issue.
///
/// Extra fields are allowed; only the fields the harness asserts on are
/// constrained.
fn issue_schema() -> Value {
    json!({
        "type": "object",
        "required": [
            "id", "number", "title", "user", "state",
            "comments", "created_at", "updated_at"
        ],
        "properties": {
            "id": {"type": "integer"},
            "number": {"type": "integer"},
            "title": {"type": "string"},
            "body": {"type": ["string", "null"]},
            "user": {
                "type": "object",
                "required": ["login", "id", "avatar_url", "html_url"],
                "properties": {
                    "login": {"type": "string"},
                    "id": {"type": "integer"},
                    "avatar_url": {"type": "string"},
                    "html_url": {"type": "string"}
                }
            },
            "state": {"enum": ["open", "closed"]},
            "comments": {"type": "integer", "minimum": 0},
            "created_at": {"type": "string", "format": "date-time"},
            "updated_at": {"type": "string", "format": "date-time"},
            "labels": {"type": "array"}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> Value {
        json!({
            "id": 1_000_001,
            "number": 42,
            "title": "Flaky pagination when filters collide",
            "body": "Steps to reproduce...",
            "user": {
                "login": "octocat",
                "id": 583_231,
                "avatar_url": "https://avatars.example.com/u/583231",
                "html_url": "https://example.com/octocat"
            },
            "state": "open",
            "comments": 0,
            "created_at": "2026-08-05T10:15:02Z",
            "updated_at": "2026-08-05T10:15:02Z",
            "labels": []
        })
    }

    #[test]
    fn conforming_issue_passes() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let verdict = contract.validate(&sample_issue());
        assert!(verdict.pass, "{}", verdict.diagnostic);
        assert_eq!(verdict.diagnostic, MATCHES_CONTRACT);
    }

    #[test]
    fn missing_id_fails_and_names_the_field() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let mut issue = sample_issue();
        issue.as_object_mut().unwrap().remove("id");

        let verdict = contract.validate(&issue);
        assert!(!verdict.pass);
        assert!(
            verdict.diagnostic.contains("id"),
            "diagnostic should mention 'id': {}",
            verdict.diagnostic
        );
    }

    #[test]
    fn nested_violation_reports_the_instance_path() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let mut issue = sample_issue();
        issue["user"]["login"] = json!(42);

        let verdict = contract.validate(&issue);
        assert!(!verdict.pass);
        assert!(
            verdict.diagnostic.contains("/user/login"),
            "diagnostic should mention the path: {}",
            verdict.diagnostic
        );
    }

    #[test]
    fn wrong_state_value_fails() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let mut issue = sample_issue();
        issue["state"] = json!("archived");

        let verdict = contract.validate(&issue);
        assert!(!verdict.pass);
    }

    #[test]
    fn negative_comment_count_fails() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let mut issue = sample_issue();
        issue["comments"] = json!(-1);

        let verdict = contract.validate(&issue);
        assert!(!verdict.pass);
    }

    #[test]
    fn null_body_is_allowed() {
        let contract = Contract::issue().expect("built-in schema compiles");
        let mut issue = sample_issue();
        issue["body"] = Value::Null;

        let verdict = contract.validate(&issue);
        assert!(verdict.pass, "{}", verdict.diagnostic);
    }

    #[test]
    fn list_contract_accepts_an_array_of_issues() {
        let contract = Contract::issue_list().expect("built-in schema compiles");
        let verdict = contract.validate(&json!([sample_issue(), sample_issue()]));
        assert!(verdict.pass, "{}", verdict.diagnostic);
    }

    #[test]
    fn list_contract_rejects_a_bare_object() {
        let contract = Contract::issue_list().expect("built-in schema compiles");
        let verdict = contract.validate(&sample_issue());
        assert!(!verdict.pass);
    }

    #[test]
    fn validation_never_panics_on_odd_values() {
        let contract = Contract::issue().expect("built-in schema compiles");
        for value in [Value::Null, json!(""), json!(0), json!([]), json!({})] {
            let verdict = contract.validate(&value);
            assert!(!verdict.pass);
            assert!(!verdict.diagnostic.is_empty());
        }
    }

    #[test]
    fn invalid_schema_is_a_compile_error() {
        let result = Contract::new(&json!({"type": "no-such-type"}));
        assert!(matches!(result, Err(ContractError::InvalidSchema { .. })));
    }
}
