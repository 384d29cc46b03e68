//! Structural strategy tables
//!
//! Each field is pulled through an ordered chain of [`Strategy`] values.
//! The chains are plain data: the DOM backend renders a [`Marker`] to a CSS
//! selector, the pattern backend checks the same marker against the opening
//! tags it scans. Both read these tables, so a selector change lands in
//! both integrations at once.

use crate::config::PageType;

/// A structural marker identifying an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Element carrying this class token.
    Class(&'static str),
    /// Element with class `inner` somewhere below an element with class `outer`.
    Nested {
        outer: &'static str,
        inner: &'static str,
    },
    /// Element whose `attr` value contains `fragment`, optionally restricted to a tag.
    AttrContains {
        tag: Option<&'static str>,
        attr: &'static str,
        fragment: &'static str,
    },
    /// Element carrying the attribute at all.
    HasAttr(&'static str),
    /// Any element with this tag name.
    Tag(&'static str),
}

impl Marker {
    /// CSS selector equivalent of this marker.
    pub fn css(&self) -> String {
        match self {
            Marker::Class(class) => format!(".{}", class),
            Marker::Nested { outer, inner } => format!(".{} .{}", outer, inner),
            Marker::AttrContains {
                tag,
                attr,
                fragment,
            } => format!("{}[{}*=\"{}\"]", tag.unwrap_or(""), attr, fragment),
            Marker::HasAttr(attr) => format!("[{}]", attr),
            Marker::Tag(tag) => tag.to_string(),
        }
    }

    /// Whether an element with this tag and attribute list is matched by the
    /// marker on its own. For [`Marker::Nested`] only the inner class is
    /// checked; the ancestor is the caller's job.
    pub fn accepts(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        let attr_value = |name: &str| {
            attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        };
        let has_class = |class: &str| {
            attr_value("class")
                .map(|v| v.split_whitespace().any(|c| c == class))
                .unwrap_or(false)
        };

        match *self {
            Marker::Class(class) => has_class(class),
            Marker::Nested { inner, .. } => has_class(inner),
            Marker::AttrContains {
                tag: want,
                attr,
                fragment,
            } => {
                want.map_or(true, |t| t.eq_ignore_ascii_case(tag))
                    && attr_value(attr).map_or(false, |v| v.contains(fragment))
            }
            Marker::HasAttr(name) => attr_value(name).is_some(),
            Marker::Tag(want) => want.eq_ignore_ascii_case(tag),
        }
    }
}

/// What to read from the element a marker found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Text,
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub marker: Marker,
    pub accessor: Accessor,
}

const fn text(marker: Marker) -> Strategy {
    Strategy {
        marker,
        accessor: Accessor::Text,
    }
}

const fn attr(marker: Marker, name: &'static str) -> Strategy {
    Strategy {
        marker,
        accessor: Accessor::Attr(name),
    }
}

const fn link_containing(fragment: &'static str) -> Marker {
    Marker::AttrContains {
        tag: Some("a"),
        attr: "href",
        fragment,
    }
}

const fn aria_label(fragment: &'static str) -> Marker {
    Marker::AttrContains {
        tag: None,
        attr: "aria-label",
        fragment,
    }
}

pub const AUTHOR_NAME: &[Strategy] = &[
    text(Marker::Class("update-components-actor__name")),
    text(Marker::Class("feed-shared-actor__name")),
    text(Marker::Nested {
        outer: "search-result__info",
        inner: "actor-name",
    }),
    text(Marker::Class("entity-result__title-text")),
];

pub const AUTHOR_TITLE: &[Strategy] = &[
    text(Marker::Class("update-components-actor__description")),
    text(Marker::Class("feed-shared-actor__description")),
    text(Marker::Nested {
        outer: "search-result__info",
        inner: "subline-level-1",
    }),
    text(Marker::Class("entity-result__primary-subtitle")),
];

pub const AUTHOR_PROFILE: &[Strategy] = &[attr(link_containing("/in/"), "href")];

pub const AUTHOR_IMAGE: &[Strategy] = &[
    attr(Marker::Class("update-components-actor__avatar-image"), "src"),
    attr(Marker::Tag("img"), "src"),
];

pub const POST_URL: &[Strategy] = &[
    attr(link_containing("/posts/"), "href"),
    attr(link_containing("/activity/"), "href"),
];

pub const TIMESTAMP: &[Strategy] = &[
    attr(Marker::Tag("time"), "datetime"),
    attr(Marker::HasAttr("data-timestamp"), "data-timestamp"),
];

pub const CONTENT: &[Strategy] = &[
    text(Marker::Class("update-components-text")),
    text(Marker::Class("feed-shared-update-v2__description")),
    text(Marker::Class("feed-shared-text")),
    text(Marker::Class("entity-result__summary")),
    text(Marker::Class("search-result__snippets")),
];

pub const LIKES: &[Strategy] = &[
    text(Marker::Class("social-counts-likes")),
    text(Marker::Class("feed-shared-social-action-bar__likes")),
    text(aria_label("likes")),
];

pub const COMMENTS: &[Strategy] = &[
    text(Marker::Class("social-counts-comments")),
    text(Marker::Class("feed-shared-social-action-bar__comments")),
    text(aria_label("comments")),
];

pub const SHARES: &[Strategy] = &[
    text(Marker::Class("social-counts-shares")),
    text(Marker::Class("feed-shared-social-action-bar__shares")),
    text(aria_label("shares")),
];

/// A set of markers evaluated together as one locator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerGroup {
    pub name: &'static str,
    pub markers: &'static [Marker],
}

const FEED_UPDATE: ContainerGroup = ContainerGroup {
    name: "feed-update",
    markers: &[Marker::Class("feed-shared-update-v2")],
};

const COMPONENT_UPDATE: ContainerGroup = ContainerGroup {
    name: "component-update",
    markers: &[Marker::Class("update-components-update")],
};

const ACTIVITY_URN: ContainerGroup = ContainerGroup {
    name: "activity-urn",
    markers: &[Marker::AttrContains {
        tag: None,
        attr: "data-urn",
        fragment: "urn:li:activity",
    }],
};

const CARD: ContainerGroup = ContainerGroup {
    name: "card",
    markers: &[Marker::Class("artdeco-card")],
};

const SEARCH_RESULT: ContainerGroup = ContainerGroup {
    name: "search-result",
    markers: &[Marker::Class("search-result__wrapper")],
};

const SEARCH_CONTAINER: ContainerGroup = ContainerGroup {
    name: "search-container",
    markers: &[Marker::Class("reusable-search__result-container")],
};

const SEARCH_SUMMARY: ContainerGroup = ContainerGroup {
    name: "search-summary",
    markers: &[
        Marker::Class("entity-result__summary"),
        Marker::Class("update-components-text"),
    ],
};

const JOB_CARD: ContainerGroup = ContainerGroup {
    name: "job-card",
    markers: &[Marker::Class("job-card-container")],
};

const JOB_LIST_ITEM: ContainerGroup = ContainerGroup {
    name: "job-list-item",
    markers: &[Marker::Class("jobs-search-results__list-item")],
};

const JOB_ID: ContainerGroup = ContainerGroup {
    name: "job-id",
    markers: &[Marker::HasAttr("data-job-id")],
};

const FEED_GROUPS: &[ContainerGroup] = &[FEED_UPDATE, COMPONENT_UPDATE, ACTIVITY_URN, CARD];

const SEARCH_GROUPS: &[ContainerGroup] = &[
    FEED_UPDATE,
    ACTIVITY_URN,
    SEARCH_RESULT,
    SEARCH_CONTAINER,
    SEARCH_SUMMARY,
];

const JOB_GROUPS: &[ContainerGroup] = &[JOB_CARD, JOB_LIST_ITEM, JOB_ID];

/// Container groups for a page type, highest priority first.
pub fn container_groups(page_type: PageType) -> Vec<ContainerGroup> {
    match page_type {
        PageType::Feed => FEED_GROUPS.to_vec(),
        PageType::Search => SEARCH_GROUPS.to_vec(),
        PageType::Jobs => JOB_GROUPS.to_vec(),
        PageType::Unknown => {
            let mut groups = FEED_GROUPS.to_vec();
            for group in SEARCH_GROUPS.iter().chain(JOB_GROUPS) {
                if !groups.contains(group) {
                    groups.push(*group);
                }
            }
            groups
        }
    }
}

/// Generic elements considered by the broad fallback.
pub const FALLBACK_TAGS: &[&str] = &["div", "article", "section", "li"];

/// Attributes inspected for role hints on fallback containers.
pub const IDENTIFYING_ATTRS: &[&str] = &["class", "id", "data-urn", "data-id", "role"];

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_marker_css() {
        assert_eq!(Marker::Class("a").css(), ".a");
        assert_eq!(
            Marker::Nested {
                outer: "o",
                inner: "i"
            }
            .css(),
            ".o .i"
        );
        assert_eq!(link_containing("/in/").css(), r#"a[href*="/in/"]"#);
        assert_eq!(aria_label("likes").css(), r#"[aria-label*="likes"]"#);
        assert_eq!(Marker::HasAttr("data-job-id").css(), "[data-job-id]");
        assert_eq!(Marker::Tag("img").css(), "img");
    }

    #[test]
    fn test_marker_accepts_class_tokens() {
        let marker = Marker::Class("update-components-text");
        assert!(marker.accepts("div", &attrs(&[("class", "x update-components-text y")])));
        assert!(!marker.accepts("div", &attrs(&[("class", "update-components-text-view")])));
        assert!(!marker.accepts("div", &attrs(&[])));
    }

    #[test]
    fn test_marker_accepts_attributes() {
        let profile = link_containing("/in/");
        assert!(profile.accepts("a", &attrs(&[("href", "https://x.com/in/ada")])));
        assert!(profile.accepts("A", &attrs(&[("HREF", "/in/ada")])));
        assert!(!profile.accepts("span", &attrs(&[("href", "/in/ada")])));
        assert!(!profile.accepts("a", &attrs(&[("href", "/company/x")])));

        assert!(Marker::HasAttr("data-job-id").accepts("li", &attrs(&[("data-job-id", "")])));
        assert!(Marker::Tag("img").accepts("IMG", &attrs(&[])));
    }

    #[test]
    fn test_unknown_groups_cover_every_page_type() {
        let unknown = container_groups(PageType::Unknown);
        for page_type in [PageType::Feed, PageType::Search, PageType::Jobs] {
            for group in container_groups(page_type) {
                assert!(unknown.contains(&group), "missing {}", group.name);
            }
        }
        assert_eq!(unknown[0], FEED_UPDATE);
        let names: std::collections::HashSet<_> = unknown.iter().map(|g| g.name).collect();
        assert_eq!(names.len(), unknown.len());
    }
}
