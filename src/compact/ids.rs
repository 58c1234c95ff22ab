//! Loose extraction of issue identifiers from LLM-authored text.
//!
//! The migration payload is only loosely schematized (a single `id:` field,
//! a `compactedIssues:` list, prose mentions...), so identifiers are found by
//! shape rather than by deserializing the YAML. Field-name drift in the
//! reply therefore never hides an identifier.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Canonical 8-4-4-4-12 hexadecimal identifier, any case.
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static ISSUE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b")
        .expect("ISSUE_ID_REGEX is a valid regex literal")
});

/// Collect every identifier-shaped substring of `text`.
///
/// Matches are lowercased, so the same identifier written in different case
/// counts once. An empty set is a valid result.
#[must_use]
pub fn extract_issue_ids(text: &str) -> BTreeSet<String> {
    ISSUE_ID_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}
