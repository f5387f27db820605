//! Stable cache keys.
//!
//! A [`QueryKey`] is an ordered list of segments: the resource type
//! first, then identifiers and filter parameters. Invalidation works on
//! prefixes, so invalidating `courses` also invalidates
//! `courses/7/lessons`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Start a key with its resource type, e.g. `"courses"`.
    pub fn new(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    /// Build a key from raw segments (e.g. from a push message).
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Append an identifier or nested resource segment.
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// Append a named filter parameter as `name=value`.
    pub fn param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.0.push(format!("{name}={value}"));
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `prefix` matches the leading segments of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
