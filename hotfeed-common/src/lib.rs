//! Common types and utilities shared across hotfeed crates.
//!
//! This crate defines the normalized item record every source emits and the
//! observability helpers used by binaries and integration tests. It is
//! intentionally lightweight so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`NewsItem`]: one normalized trending entry
//! - [`NewsExtra`]: optional display metadata attached to an item
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Items serialize without an `extra` key when no metadata is present:
//!
//! ```rust
//! use hotfeed_common::NewsItem;
//!
//! let item = NewsItem::new("abc", "Hello", "https://example.com/abc");
//! let json = serde_json::to_string(&item).unwrap();
//! assert_eq!(json, r#"{"id":"abc","title":"Hello","url":"https://example.com/abc"}"#);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// A normalized trending entry as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Platform identifier of the entry.
    pub id: String,
    /// Trimmed, never empty.
    pub title: String,
    /// Fully-qualified link to the entry.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<NewsExtra>,
}

impl NewsItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            extra: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.extra = Some(NewsExtra { info: info.into() });
        self
    }

    /// Single-line display info, if any.
    pub fn info(&self) -> Option<&str> {
        self.extra.as_ref().map(|e| e.info.as_str())
    }
}

/// Display metadata shown next to an item title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsExtra {
    pub info: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_extra_when_present() {
        let item = NewsItem::new("1", "t", "https://x.test/1").with_info("Ann · 42赞");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": "1", "title": "t", "url": "https://x.test/1", "extra": {"info": "Ann · 42赞"}})
        );
        assert_eq!(item.info(), Some("Ann · 42赞"));
    }

    #[test]
    fn deserializes_without_extra() {
        let item: NewsItem =
            serde_json::from_value(json!({"id": "1", "title": "t", "url": "u"})).unwrap();
        assert!(item.extra.is_none());
    }
}
