//! Keyword-matching post extraction for professional network feeds
//!
//! Scans a feed, search or jobs page and returns the posts whose text
//! contains a term from the user's keyword catalog or the fixed job
//! vocabulary:
//! - Candidate Locator (ordered container strategies with a generic fallback)
//! - Field Extractor (author, content, link, timestamp, engagement counts)
//! - Keyword Matcher (case-insensitive substring containment)
//! - Post Assembler (ids, snippets, the serialized post record)
//!
//! Two backends share the same strategy tables: a parsed DOM (scraper) and
//! a pattern scan over raw HTML text for pages fetched out of band.

pub mod assembler;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod ffi;
pub mod locator;
pub mod matcher;
pub mod scan;
pub mod strategies;
pub mod text;

pub use assembler::{AuthorInfo, Post};
pub use backend::{Backend, DomPage, PageSource, PatternPage, UnitSource};
pub use catalog::KeywordCatalog;
pub use config::{PageType, ScanConfig};
pub use error::{Result, ScanError};
pub use ffi::*;
pub use scan::{ScanOutcome, ScanResult, Scanner};
