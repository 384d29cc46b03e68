//! End-to-end scan: locate, extract, match, assemble
//!
//! A scan runs synchronously to completion over one page and produces a
//! single [`ScanResult`]. Unreadable units are logged and skipped; an empty
//! result is a normal outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assembler::{assemble, BatchSeed, Post};
use crate::backend::{Backend, DomPage, PageSource, PatternPage};
use crate::catalog::KeywordCatalog;
use crate::config::{PageType, ScanConfig};
use crate::extractor::{extract, iso8601};
use crate::locator::locate;
use crate::matcher::KeywordMatcher;

/// Why a result is or isn't empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanOutcome {
    Matched,
    /// Candidates were found but none matched a keyword.
    NoMatches,
    /// No strategy found any candidate unit.
    NoCandidates,
}

/// One batch of posts, delivered once per scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub posts: Vec<Post>,
    pub completed_at: String,
    pub outcome: ScanOutcome,
    pub source: Backend,
    /// Candidate units considered.
    pub candidates: usize,
    /// Units skipped because they could not be read.
    pub skipped: usize,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

pub struct Scanner {
    matcher: KeywordMatcher,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(catalog: &KeywordCatalog, config: ScanConfig) -> Self {
        Self::with_matcher(KeywordMatcher::new(catalog), config)
    }

    pub fn with_matcher(matcher: KeywordMatcher, config: ScanConfig) -> Self {
        Self { matcher, config }
    }

    /// Scan a live/parsed document.
    pub fn scan_document(&self, html: &str, address: &str, page_type: PageType) -> ScanResult {
        self.scan(&DomPage::parse(html, address), page_type)
    }

    /// Scan raw HTML text without building a tree.
    pub fn scan_html_text(&self, html: &str, address: &str, page_type: PageType) -> ScanResult {
        self.scan(&PatternPage::new(html, address), page_type)
    }

    pub fn scan_with(
        &self,
        backend: Backend,
        html: &str,
        address: &str,
        page_type: PageType,
    ) -> ScanResult {
        match backend {
            Backend::Dom => self.scan_document(html, address, page_type),
            Backend::Pattern => self.scan_html_text(html, address, page_type),
        }
    }

    pub fn scan<P: PageSource>(&self, page: &P, page_type: PageType) -> ScanResult {
        self.scan_at(page, page_type, Utc::now())
    }

    /// Scan with an explicit extraction instant, which also seeds post ids.
    pub fn scan_at<P: PageSource>(
        &self,
        page: &P,
        page_type: PageType,
        now: DateTime<Utc>,
    ) -> ScanResult {
        let candidates = locate(page, page_type, &self.config);
        let seed = BatchSeed::new(&self.config.id_prefix, now.timestamp_millis());

        let mut posts = Vec::new();
        let mut skipped = 0;

        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(cap) = self.config.max_posts {
                if posts.len() >= cap {
                    debug!(cap, "post cap reached");
                    break;
                }
            }

            let fields = match extract(candidate, page.address(), &self.config, now) {
                Ok(fields) => fields,
                Err(e) => {
                    warn!(origin = candidate.origin, index, error = %e, "skipping unit");
                    skipped += 1;
                    continue;
                }
            };

            let matched = self.matcher.matched_keywords(&fields.content);
            if let Some(post) = assemble(fields, matched, &seed, index, self.config.snippet_len) {
                posts.push(post);
            }
        }

        let outcome = if !posts.is_empty() {
            ScanOutcome::Matched
        } else if candidates.is_empty() {
            ScanOutcome::NoCandidates
        } else {
            ScanOutcome::NoMatches
        };

        info!(
            backend = ?page.backend(),
            ?page_type,
            candidates = candidates.len(),
            posts = posts.len(),
            skipped,
            "scan complete"
        );

        ScanResult {
            posts,
            completed_at: iso8601(Utc::now()),
            outcome,
            source: page.backend(),
            candidates: candidates.len(),
            skipped,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(&KeywordCatalog::default(), ScanConfig::default())
    }
}
