//! Candidate Locator
//!
//! Container groups are tried in priority order and the first group with
//! any match wins outright. Groups are never merged: overlapping groups
//! target the same visual post at different depths.

use tracing::debug;

use crate::backend::{PageSource, UnitSource};
use crate::config::{PageType, ScanConfig};
use crate::strategies::container_groups;

/// Origin recorded for units found by the broad fallback.
pub const FALLBACK_ORIGIN: &str = "fallback";

/// A unit plus the group that found it. The origin is diagnostic only.
#[derive(Debug, Clone, Copy)]
pub struct CandidateUnit<U> {
    pub origin: &'static str,
    pub unit: U,
}

/// Enumerate candidate units on a page. Never fails: a page with no
/// recognizable structure, including a partially rendered one, yields an
/// empty list.
pub fn locate<'p, P: PageSource>(
    page: &'p P,
    page_type: PageType,
    config: &ScanConfig,
) -> Vec<CandidateUnit<P::Unit<'p>>> {
    for group in container_groups(page_type) {
        let units = page.select_group(&group);
        debug!(group = group.name, found = units.len(), "container group");

        if !units.is_empty() {
            return units
                .into_iter()
                .map(|unit| CandidateUnit {
                    origin: group.name,
                    unit,
                })
                .collect();
        }
    }

    let fallback: Vec<_> = page
        .generic_containers()
        .into_iter()
        .filter(|unit| looks_like_post(unit, config))
        .take(config.fallback_cap)
        .map(|unit| CandidateUnit {
            origin: FALLBACK_ORIGIN,
            unit,
        })
        .collect();

    debug!(found = fallback.len(), "broad fallback");
    fallback
}

fn looks_like_post<U: UnitSource>(unit: &U, config: &ScanConfig) -> bool {
    let signature = unit.signature().to_lowercase();
    let has_role = config
        .fallback_role_hints
        .iter()
        .any(|hint| signature.contains(&hint.to_lowercase()));

    has_role
        && unit
            .text()
            .map_or(false, |text| text.chars().count() > config.min_fallback_text_len)
}
