//! Page backends
//!
//! The locator and extractor never touch markup directly. They ask a
//! [`PageSource`] for candidate units and ask each [`UnitSource`] to run a
//! [`Strategy`]. Two realizations exist:
//!
//! - [`dom`]: a parsed document tree (`scraper`), the live-page integration
//! - [`pattern`]: regex scanning over raw HTML text, for contexts that have
//!   the fetched markup but no document parser

pub mod dom;
pub mod pattern;

pub use dom::{DomPage, DomUnit};
pub use pattern::{PatternPage, PatternUnit};

use serde::{Deserialize, Serialize};

use crate::strategies::{ContainerGroup, Strategy};

/// Which realization produced a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Dom,
    Pattern,
}

/// A full page that can enumerate candidate content units.
pub trait PageSource {
    type Unit<'a>: UnitSource
    where
        Self: 'a;

    /// Address of the page, used to resolve relative links and as the
    /// default post URL.
    fn address(&self) -> &str;

    /// All elements matched by any marker of the group, in document order.
    fn select_group(&self, group: &ContainerGroup) -> Vec<Self::Unit<'_>>;

    /// Generic container elements for the broad fallback, in document order.
    fn generic_containers(&self) -> Vec<Self::Unit<'_>>;

    fn backend(&self) -> Backend;
}

/// One candidate content unit.
pub trait UnitSource {
    /// Run one strategy below this unit. Returns the trimmed value, or
    /// `None` when nothing matched or the value is empty.
    fn query(&self, strategy: &Strategy) -> Option<String>;

    /// Whitespace-collapsed visible text of the whole unit. `None` when the
    /// unit can no longer be read.
    fn text(&self) -> Option<String>;

    /// Space-joined values of the unit's identifying attributes.
    fn signature(&self) -> String;
}
