//! Parsed-tree backend
//!
//! Uses the scraper crate: markers become CSS selectors and are evaluated
//! with `querySelector` semantics (first match below the unit).

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{Backend, PageSource, UnitSource};
use crate::strategies::{Accessor, ContainerGroup, Marker, Strategy, FALLBACK_TAGS, IDENTIFYING_ATTRS};
use crate::text::collapse_whitespace;

/// A parsed HTML document plus the address it was loaded from.
pub struct DomPage {
    document: Html,
    address: String,
}

impl DomPage {
    pub fn parse(html: &str, address: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            address: address.to_string(),
        }
    }
}

impl PageSource for DomPage {
    type Unit<'a> = DomUnit<'a>;

    fn address(&self) -> &str {
        &self.address
    }

    fn select_group(&self, group: &ContainerGroup) -> Vec<DomUnit<'_>> {
        let css = group
            .markers
            .iter()
            .map(Marker::css)
            .collect::<Vec<_>>()
            .join(", ");

        let Some(selector) = compile(&css) else {
            return vec![];
        };

        self.document.select(&selector).map(DomUnit).collect()
    }

    fn generic_containers(&self) -> Vec<DomUnit<'_>> {
        let Some(selector) = compile(&FALLBACK_TAGS.join(", ")) else {
            return vec![];
        };

        self.document.select(&selector).map(DomUnit).collect()
    }

    fn backend(&self) -> Backend {
        Backend::Dom
    }
}

/// One element of a [`DomPage`].
#[derive(Debug, Clone, Copy)]
pub struct DomUnit<'a>(pub ElementRef<'a>);

impl UnitSource for DomUnit<'_> {
    fn query(&self, strategy: &Strategy) -> Option<String> {
        let selector = compile(&strategy.marker.css())?;
        let found = self.0.select(&selector).next()?;

        let value = match strategy.accessor {
            Accessor::Text => visible_text(found),
            Accessor::Attr(name) => found.value().attr(name)?.trim().to_string(),
        };

        (!value.is_empty()).then_some(value)
    }

    fn text(&self) -> Option<String> {
        Some(visible_text(self.0))
    }

    fn signature(&self) -> String {
        IDENTIFYING_ATTRS
            .iter()
            .filter_map(|name| self.0.value().attr(name))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = ?e, "skipping unparsable selector");
            None
        }
    }
}

/// Text nodes below `element`, skipping script and style bodies. Adjacent
/// nodes are joined with a space so sibling blocks don't run together.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |el| matches!(el.name(), "script" | "style"))
            });

        if !hidden {
            parts.push(&**text);
        }
    }

    collapse_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{AUTHOR_NAME, AUTHOR_PROFILE, CONTENT};

    const ADDRESS: &str = "https://www.linkedin.com/feed/";

    #[test]
    fn test_select_group_document_order() {
        let html = r#"
        <div class="update-components-text">first</div>
        <p class="entity-result__summary">second</p>
        <div class="update-components-text">third</div>
        "#;
        let page = DomPage::parse(html, ADDRESS);
        let group = ContainerGroup {
            name: "t",
            markers: &[
                Marker::Class("entity-result__summary"),
                Marker::Class("update-components-text"),
            ],
        };

        let texts: Vec<_> = page
            .select_group(&group)
            .iter()
            .filter_map(|u| u.text())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_query_first_match() {
        let html = r#"
        <div class="feed-shared-update-v2" data-urn="urn:li:activity:1">
            <span class="feed-shared-actor__name">  Ada   Lovelace </span>
            <a href="/in/ada">profile</a>
            <div class="update-components-text"><p>Hello</p><p>world</p></div>
        </div>
        "#;
        let page = DomPage::parse(html, ADDRESS);
        let unit = page.select_group(&ContainerGroup {
            name: "t",
            markers: &[Marker::Class("feed-shared-update-v2")],
        })[0];

        assert_eq!(unit.query(&AUTHOR_NAME[0]), None);
        assert_eq!(unit.query(&AUTHOR_NAME[1]).unwrap(), "Ada Lovelace");
        assert_eq!(unit.query(&AUTHOR_PROFILE[0]).unwrap(), "/in/ada");
        assert_eq!(unit.query(&CONTENT[0]).unwrap(), "Hello world");
        assert_eq!(unit.signature(), "feed-shared-update-v2 urn:li:activity:1");
    }

    #[test]
    fn test_text_skips_scripts() {
        let html = r#"<div class="c">visible<script>var hidden = 1;</script><style>.x{}</style> text</div>"#;
        let page = DomPage::parse(html, ADDRESS);
        let unit = page.select_group(&ContainerGroup {
            name: "t",
            markers: &[Marker::Class("c")],
        })[0];
        assert_eq!(unit.text().unwrap(), "visible text");
    }

    #[test]
    fn test_empty_text_is_no_match() {
        let html = r#"<div class="c"><span class="feed-shared-actor__name">   </span></div>"#;
        let page = DomPage::parse(html, ADDRESS);
        let unit = page.select_group(&ContainerGroup {
            name: "t",
            markers: &[Marker::Class("c")],
        })[0];
        assert_eq!(unit.query(&AUTHOR_NAME[1]), None);
    }
}
