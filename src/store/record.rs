//! Record abstraction and free-text search.
//!
//! # Responsibilities
//! - Describe what the store needs from a record type (identity, searchable
//!   fields, update hooks)
//! - Evaluate search criteria against a record
//!
//! # Design Decisions
//! - Search is OR across fields: one matching field is enough
//! - Matching is a case-insensitive substring test
//! - A record without a searched field simply does not match on that field

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record stored in a collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial update merged over an existing record.
    type Patch: Send;

    /// Unique, immutable identifier within the collection.
    fn id(&self) -> &str;

    /// Text value of a searchable field, if the record has one.
    fn field(&self, name: &str) -> Option<&str>;

    /// Merge `patch` over the record's fields.
    fn merge(&mut self, patch: Self::Patch);

    /// Stamp the record as updated.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Stamp the record as completed.
    fn mark_completed(&mut self, now: DateTime<Utc>);
}

/// Field name → substring pairs, evaluated with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    terms: Vec<(String, String)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field contains needle` term.
    pub fn with(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.terms.push((field.into(), needle.into().to_lowercase()));
        self
    }

    /// Search every listed field for the same needle.
    pub fn any_field<I, S>(fields: I, needle: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .fold(Self::new(), |criteria, field| criteria.with(field, needle))
    }

    /// True when at least one term matches. Empty criteria match everything.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        self.terms.iter().any(|(field, needle)| {
            record
                .field(field)
                .map(|value| value.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Task;

    fn task(title: &str, description: &str) -> Task {
        Task::new(title, description, Utc::now())
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        assert!(SearchCriteria::new().matches(&task("a", "b")));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let criteria = SearchCriteria::new().with("title", "AB");
        assert!(criteria.matches(&task("xabc", "zzz")));
        assert!(!criteria.matches(&task("xyz", "ab")));
    }

    #[test]
    fn test_or_semantics_across_fields() {
        let criteria = SearchCriteria::new()
            .with("title", "ab")
            .with("description", "cd");
        assert!(criteria.matches(&task("abc", "zzz")));
        assert!(criteria.matches(&task("zzz", "xcdx")));
        assert!(!criteria.matches(&task("zzz", "zzz")));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let criteria = SearchCriteria::new().with("owner", "a");
        assert!(!criteria.matches(&task("a", "a")));
    }
}
