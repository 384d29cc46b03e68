//! Match vocabularies
//!
//! The catalog is the user's profile (skills, preferences, tools). The job
//! vocabulary is fixed and signals hiring context.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Categorized keyword lists used as the primary match vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCatalog {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        fn owned(terms: &[&str]) -> Vec<String> {
            terms.iter().map(|t| t.to_string()).collect()
        }

        Self {
            skills: owned(&["JavaScript", "React", "Next.js", "HTML", "CSS", "TypeScript"]),
            preferences: owned(&[
                "Remote jobs",
                "Startup culture",
                "React projects",
                "Frontend",
                "Full Stack",
            ]),
            tools: owned(&["VSCode", "Figma", "Chrome DevTools", "Git", "Webpack"]),
        }
    }
}

impl KeywordCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Skills, then preferences, then tools.
    pub fn vocabulary(&self) -> Vec<&str> {
        self.skills
            .iter()
            .chain(&self.preferences)
            .chain(&self.tools)
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.preferences.is_empty() && self.tools.is_empty()
    }
}

/// Terms that mark a post as an opportunity regardless of the catalog.
pub const JOB_VOCABULARY: &[&str] = &[
    "hiring",
    "job",
    "opportunity",
    "opening",
    "position",
    "remote",
    "developer",
    "engineer",
    "freelance",
    "contract",
    "looking for",
    "apply",
];
