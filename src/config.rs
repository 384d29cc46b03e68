//! Scan tuning and page-type hints

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunable thresholds and caps for one scan.
///
/// Every field has a default, so a partial JSON object such as
/// `{"maxPosts": 2}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Broad-fallback containers need strictly more characters than this.
    pub min_fallback_text_len: usize,
    /// Maximum number of units the broad fallback may return.
    pub fallback_cap: usize,
    /// Characters kept when content falls back to the unit's full text.
    pub content_cap: usize,
    pub snippet_len: usize,
    /// Stop after this many matched posts. `None` keeps every match.
    pub max_posts: Option<usize>,
    /// Leading component of generated post ids.
    pub id_prefix: String,
    /// Attribute fragments that mark a generic container as a post.
    pub fallback_role_hints: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_fallback_text_len: 50,
            fallback_cap: 10,
            content_cap: 500,
            snippet_len: 200,
            max_posts: None,
            id_prefix: "scan".to_string(),
            fallback_role_hints: vec![
                "feed".to_string(),
                "update".to_string(),
                "activity".to_string(),
            ],
        }
    }
}

impl ScanConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What kind of page is being scanned; selects the container groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Feed,
    Search,
    Jobs,
    #[default]
    Unknown,
}

impl PageType {
    /// Infer the hint from a page address.
    pub fn from_url(address: &str) -> Self {
        let path = match url::Url::parse(address) {
            Ok(u) => u.path().to_ascii_lowercase(),
            Err(_) => address.to_ascii_lowercase(),
        };

        if path.starts_with("/feed") {
            PageType::Feed
        } else if path.starts_with("/search/") {
            PageType::Search
        } else if path.starts_with("/jobs") {
            PageType::Jobs
        } else {
            PageType::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config = ScanConfig::from_json(r#"{"maxPosts": 2, "snippetLen": 80}"#).unwrap();
        assert_eq!(config.max_posts, Some(2));
        assert_eq!(config.snippet_len, 80);
        assert_eq!(config.min_fallback_text_len, 50);
        assert_eq!(config.fallback_cap, 10);
        assert_eq!(config.id_prefix, "scan");
    }

    #[test]
    fn test_bad_config() {
        assert!(ScanConfig::from_json(r#"{"maxPosts": "two"}"#).is_err());
    }

    #[test]
    fn test_page_type_from_url() {
        assert_eq!(PageType::from_url("https://www.linkedin.com/feed/"), PageType::Feed);
        assert_eq!(
            PageType::from_url("https://www.linkedin.com/search/results/content/?keywords=rust"),
            PageType::Search
        );
        assert_eq!(PageType::from_url("https://www.linkedin.com/jobs/view/1"), PageType::Jobs);
        assert_eq!(PageType::from_url("https://www.linkedin.com/in/someone"), PageType::Unknown);
        assert_eq!(PageType::from_url("not a url"), PageType::Unknown);
    }
}
