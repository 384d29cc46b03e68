//! Keyword Matcher
//!
//! Case-insensitive substring containment. There is no tokenization, so a
//! term also matches inside a longer word ("Git" matches "GitHub").

use crate::catalog::{KeywordCatalog, JOB_VOCABULARY};

/// Terms of `vocabulary` found in `text`, in vocabulary order. Blank terms
/// never match.
pub fn match_terms<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> Vec<String> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .map(|term| term.as_ref())
        .filter(|term: &&str| is_present(&haystack, term))
        .map(str::to_string)
        .collect()
}

fn is_present(lowercase_text: &str, term: &str) -> bool {
    !term.trim().is_empty() && lowercase_text.contains(&term.to_lowercase())
}

/// Matches text against the catalog and the job vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    catalog_terms: Vec<String>,
    job_terms: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(catalog: &KeywordCatalog) -> Self {
        Self::with_job_terms(catalog, JOB_VOCABULARY)
    }

    pub fn with_job_terms<S: AsRef<str>>(catalog: &KeywordCatalog, job_terms: &[S]) -> Self {
        Self {
            catalog_terms: catalog.vocabulary().into_iter().map(String::from).collect(),
            job_terms: job_terms.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Catalog matches followed by job-term matches. A term present in both
    /// vocabularies appears twice.
    pub fn matched_keywords(&self, text: &str) -> Vec<String> {
        let mut matched = match_terms(text, &self.catalog_terms);
        matched.extend(match_terms(text, &self.job_terms));
        matched
    }
}
