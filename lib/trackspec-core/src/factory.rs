//! Randomized test-data generation.
//!
//! Payloads are shaped deterministically but filled with randomized,
//! human-readable content so repeated runs against a live API never
//! collide on titles.

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::issues::IssuePayload;

/// Labels attached to every generated issue.
pub const DEFAULT_LABELS: [&str; 2] = ["bug", "improvement"];

const WORDS: &[&str] = &[
    "pagination", "filter", "token", "request", "response", "timeout", "cache", "header",
    "payload", "cursor", "retry", "webhook", "session", "upload", "export", "search", "label",
    "milestone", "branch", "merge", "review", "deploy", "metric", "quota", "schema", "endpoint",
    "fails", "breaks", "hangs", "drops", "ignores", "duplicates", "truncates", "rejects",
    "stale", "empty", "slow", "missing", "invalid", "unexpected",
];

/// Produces a creation payload with a unique title, a paragraph body, and
/// the fixed [`DEFAULT_LABELS`] set.
///
/// The title is a random sentence decorated with a UTC timestamp and a
/// short unique suffix; two payloads generated in the same instant still
/// differ.
pub fn issue_payload() -> IssuePayload {
    let mut rng = rand::thread_rng();
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();

    IssuePayload {
        title: format!("{} [{stamp}-{suffix}]", sentence(&mut rng)),
        body: Some(paragraph(&mut rng)),
        assignees: None,
        milestone: None,
        labels: Some(DEFAULT_LABELS.iter().map(ToString::to_string).collect()),
    }
}

/// A sentence-like string of 4 to 8 random words, capitalized.
pub fn sentence(rng: &mut impl Rng) -> String {
    let count = rng.gen_range(4..=8);
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        // WORDS is non-empty, choose cannot return None
        if let Some(word) = WORDS.choose(rng) {
            words.push(*word);
        }
    }
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence
}

/// A paragraph-like string of 2 to 4 sentences.
pub fn paragraph(rng: &mut impl Rng) -> String {
    let count = rng.gen_range(2..=4);
    let sentences: Vec<String> = (0..count).map(|_| sentence(rng)).collect();
    format!("{}.", sentences.join(". "))
}
