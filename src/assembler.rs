//! Post records and the Post Assembler

use serde::{Deserialize, Serialize};

use crate::extractor::ExtractedFields;
use crate::text::truncate_chars;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub name: String,
    pub title: String,
    pub profile_url: String,
    pub image_url: String,
}

/// One matched post, the unit handed to storage and the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author: AuthorInfo,
    pub post_url: String,
    pub timestamp: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Catalog matches, then job-term matches. Not deduplicated.
    pub matched_keywords: Vec<String>,
    pub snippet: String,
}

/// Per-scan id seed. Ids are `{prefix}_{seed}_{index}`, unique within the
/// batch because the index is the unit's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSeed {
    prefix: String,
    seed: i64,
}

impl BatchSeed {
    pub fn new(prefix: &str, seed: i64) -> Self {
        Self {
            prefix: prefix.to_string(),
            seed,
        }
    }

    pub fn id(&self, index: usize) -> String {
        format!("{}_{}_{}", self.prefix, self.seed, index)
    }
}

/// Build a post from extracted fields, or `None` when nothing matched.
pub fn assemble(
    fields: ExtractedFields,
    matched_keywords: Vec<String>,
    seed: &BatchSeed,
    index: usize,
    snippet_len: usize,
) -> Option<Post> {
    if matched_keywords.is_empty() {
        return None;
    }

    let snippet = truncate_chars(&fields.content, snippet_len).to_string();
    Some(Post {
        id: seed.id(index),
        content: fields.content,
        author: fields.author,
        post_url: fields.post_url,
        timestamp: fields.timestamp,
        likes: fields.likes,
        comments: fields.comments,
        shares: fields.shares,
        matched_keywords,
        snippet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(content: &str) -> ExtractedFields {
        ExtractedFields {
            author: AuthorInfo {
                name: "Ada".into(),
                title: String::new(),
                profile_url: String::new(),
                image_url: String::new(),
            },
            content: content.to_string(),
            post_url: "https://www.linkedin.com/feed/".into(),
            timestamp: "2024-05-01T12:00:00.000Z".into(),
            likes: 3,
            comments: 0,
            shares: 1,
        }
    }

    #[test]
    fn test_skip_without_matches() {
        let seed = BatchSeed::new("scan", 1);
        assert!(assemble(fields("Rust"), vec![], &seed, 0, 200).is_none());
    }

    #[test]
    fn test_snippet_is_prefix() {
        let seed = BatchSeed::new("scan", 1714564800000);
        let long = "é".repeat(250);

        let post = assemble(fields(&long), vec!["React".into()], &seed, 4, 200).unwrap();
        assert_eq!(post.id, "scan_1714564800000_4");
        assert_eq!(post.snippet.chars().count(), 200);
        assert!(post.content.starts_with(&post.snippet));
        assert_eq!((post.likes, post.shares), (3, 1));

        let post = assemble(fields("short"), vec!["React".into()], &seed, 5, 200).unwrap();
        assert_eq!(post.snippet, "short");
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let seed = BatchSeed::new("fetch", 9);
        let post = assemble(fields("x"), vec!["React".into(), "React".into()], &seed, 0, 200).unwrap();
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["postUrl"], "https://www.linkedin.com/feed/");
        assert_eq!(json["author"]["profileUrl"], "");
        assert_eq!(json["author"]["imageUrl"], "");
        assert_eq!(json["matchedKeywords"], serde_json::json!(["React", "React"]));
        assert_eq!(json["id"], "fetch_9_0");
    }
}
