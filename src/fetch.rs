//! Out-of-band page fetching
//!
//! Fetches feed and search pages with the caller's session cookies and
//! scans them with the pattern backend, trying each endpoint in turn until
//! one yields posts. Uses ureq (simple blocking HTTP).

use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::config::PageType;
use crate::error::{Result, ScanError};
use crate::scan::{ScanResult, Scanner};

const BASE: &str = "https://www.linkedin.com";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Anything that can produce a page's HTML for a URL.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking fetcher that sends a fixed cookie header.
pub struct FeedFetcher {
    agent: ureq::Agent,
    cookie_header: String,
}

impl FeedFetcher {
    /// `cookies` are `(name, value)` pairs from the browser's store.
    pub fn new(cookies: &[(String, String)], user_agent: &str, timeout_secs: u64) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(timeout_secs)))
                .user_agent(user_agent)
                .build(),
        );

        Self {
            agent,
            cookie_header: cookie_header(cookies),
        }
    }
}

impl PageFetcher for FeedFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let fetch_error = |message: String| ScanError::Fetch {
            url: url.to_string(),
            message,
        };

        let resp = self
            .agent
            .get(url)
            .header("Cookie", &self.cookie_header)
            .header("Accept", ACCEPT)
            .header("Accept-Language", "en-US,en;q=0.5")
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", resp.status())));
        }

        resp.into_body()
            .read_to_string()
            .map_err(|e| fetch_error(e.to_string()))
    }
}

pub fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pages worth scanning for `query`, most specific first.
pub fn endpoints(query: &str) -> Vec<(String, PageType)> {
    let search = |kind: &str| {
        Url::parse_with_params(&format!("{}/search/results/{}/", BASE, kind), &[("keywords", query)])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/search/results/{}/", BASE, kind))
    };

    vec![
        (search("content"), PageType::Search),
        (format!("{}/feed/", BASE), PageType::Feed),
        (search("all"), PageType::Search),
    ]
}

/// Fetch and scan each endpoint until one produces posts.
///
/// Returns the last empty result when every endpoint was reachable but had
/// no matches, and the last fetch error when none could be fetched.
pub fn scan_endpoints<F: PageFetcher>(
    fetcher: &F,
    endpoints: &[(String, PageType)],
    scanner: &Scanner,
) -> Result<ScanResult> {
    let mut last_empty = None;
    let mut last_error = None;

    for (url, page_type) in endpoints {
        let html = match fetcher.fetch(url) {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %url, error = %e, "fetch failed, trying next endpoint");
                last_error = Some(e);
                continue;
            }
        };

        let result = scanner.scan_html_text(&html, url, *page_type);
        if !result.is_empty() {
            info!(url = %url, posts = result.posts.len(), "endpoint produced posts");
            return Ok(result);
        }
        last_empty = Some(result);
    }

    match (last_empty, last_error) {
        (Some(result), _) => Ok(result),
        (None, Some(e)) => Err(e),
        (None, None) => Err(ScanError::InvalidInput("no endpoints to scan".to_string())),
    }
}
