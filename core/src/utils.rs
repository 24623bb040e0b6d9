//! Utility functions and types.

use std::fmt::Debug;

/// Redacts secrets and identifiers in `Debug` output.
///
/// - Empty input prints `EMPTY`.
/// - Input shorter than 12 bytes is fully masked.
/// - Longer input keeps its first and last three characters so that two
///   different API keys can still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        if s.is_empty() {
            return f.write_str("EMPTY");
        }

        match (s.get(..3), s.get(s.len().saturating_sub(3)..)) {
            (Some(head), Some(tail)) if s.len() >= 12 => write!(f, "{head}***{tail}"),
            _ => f.write_str("***"),
        }
    }
}
