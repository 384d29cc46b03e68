//! Raw-text backend
//!
//! Works on an HTML string without building a tree. One pass over the tag
//! tokens indexes every element's extent with an open-element stack, closing
//! `<li>` and `<p>` where a parser would imply their end tags. Markers are
//! then checked against the indexed opening tags, using the same [`Marker`]
//! descriptions the DOM backend turns into selectors.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use super::{Backend, PageSource, UnitSource};
use crate::strategies::{Accessor, ContainerGroup, Marker, Strategy, FALLBACK_TAGS, IDENTIFYING_ATTRS};
use crate::text::{decode_entities, mask_non_content, strip_tags};

lazy_static! {
    // Quoted attribute values may contain '>'.
    static ref TAG_TOKEN: Regex =
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap();
    static ref ATTR: Regex =
        Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap();
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Opening any of these closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// An open `<p>` below one of these is out of reach.
const PARAGRAPH_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// An open `<li>` below one of these is out of reach.
const LIST_ITEM_SCOPE: &[&str] = &[
    "article", "aside", "body", "button", "dl", "footer", "form", "header", "html", "main", "menu",
    "nav", "ol", "section", "table", "td", "th", "ul",
];

/// Byte offsets of one element inside the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    open_end: usize,
    inner_end: usize,
    end: usize,
}

impl Span {
    fn inner(&self) -> Range<usize> {
        self.open_end..self.inner_end
    }
}

#[derive(Debug)]
struct Element {
    /// Lowercased tag name.
    tag: String,
    attrs: Vec<(String, String)>,
    span: Span,
}

/// Raw HTML text plus the address it was fetched from.
///
/// Script, style and comment bodies are blanked on construction, so markup
/// quoted inside them is never mistaken for page structure.
#[derive(Debug)]
pub struct PatternPage {
    html: String,
    address: String,
    /// Every element in document order.
    elements: Vec<Element>,
}

impl PatternPage {
    pub fn new(html: impl Into<String>, address: &str) -> Self {
        let html = mask_non_content(&html.into());
        let elements = index_elements(&html);
        Self {
            html,
            address: address.to_string(),
            elements,
        }
    }

    fn units_for(&self, markers: &[Marker]) -> Vec<PatternUnit<'_>> {
        let mut found: Vec<usize> = markers
            .iter()
            .flat_map(|marker| find_elements(&self.elements, 0..self.html.len(), *marker))
            .collect();
        found.sort_unstable();
        found.dedup();

        found
            .into_iter()
            .map(|index| PatternUnit { page: self, index })
            .collect()
    }
}

impl PageSource for PatternPage {
    type Unit<'a> = PatternUnit<'a>;

    fn address(&self) -> &str {
        &self.address
    }

    fn select_group(&self, group: &ContainerGroup) -> Vec<PatternUnit<'_>> {
        self.units_for(group.markers)
    }

    fn generic_containers(&self) -> Vec<PatternUnit<'_>> {
        let markers: Vec<Marker> = FALLBACK_TAGS.iter().copied().map(Marker::Tag).collect();
        self.units_for(&markers)
    }

    fn backend(&self) -> Backend {
        Backend::Pattern
    }
}

/// One element of a [`PatternPage`].
#[derive(Debug, Clone, Copy)]
pub struct PatternUnit<'a> {
    page: &'a PatternPage,
    index: usize,
}

impl<'a> PatternUnit<'a> {
    fn element(&self) -> &'a Element {
        &self.page.elements[self.index]
    }

    /// Outer HTML of the unit, with script, style and comment bodies blanked.
    pub fn fragment(&self) -> Option<&'a str> {
        let span = self.element().span;
        self.page.html.get(span.start..span.end)
    }
}

impl UnitSource for PatternUnit<'_> {
    fn query(&self, strategy: &Strategy) -> Option<String> {
        let elements = &self.page.elements;
        let found = find_elements(elements, self.element().span.inner(), strategy.marker)
            .into_iter()
            .next()
            .map(|index| &elements[index])?;

        let value = match strategy.accessor {
            Accessor::Text => strip_tags(self.page.html.get(found.span.inner())?),
            Accessor::Attr(name) => found
                .attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim().to_string())?,
        };

        (!value.is_empty()).then_some(value)
    }

    fn text(&self) -> Option<String> {
        self.page.html.get(self.element().span.inner()).map(strip_tags)
    }

    fn signature(&self) -> String {
        let attrs = &self.element().attrs;
        IDENTIFYING_ATTRS
            .iter()
            .filter_map(|name| {
                attrs
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.as_str())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Indices of elements matched by `marker` whose opening tag lies within
/// `scope`, in document order.
fn find_elements(elements: &[Element], scope: Range<usize>, marker: Marker) -> Vec<usize> {
    if let Marker::Nested { outer, .. } = marker {
        let mut found: Vec<usize> = find_direct(elements, scope, Marker::Class(outer))
            .flat_map(|parent| find_direct(elements, elements[parent].span.inner(), marker))
            .collect();
        found.sort_unstable();
        found.dedup();
        return found;
    }

    find_direct(elements, scope, marker).collect()
}

fn find_direct(
    elements: &[Element],
    scope: Range<usize>,
    marker: Marker,
) -> impl Iterator<Item = usize> + '_ {
    let first = elements.partition_point(|el| el.span.start < scope.start);
    elements[first..]
        .iter()
        .enumerate()
        .take_while(move |(_, el)| el.span.start < scope.end)
        .filter(move |(_, el)| marker.accepts(&el.tag, &el.attrs))
        .map(move |(offset, _)| first + offset)
}

/// Index every element of `html` in one pass. Elements still open at the
/// end run to the end of the text.
fn index_elements(html: &str) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    // Indices into `elements`, innermost last.
    let mut open: Vec<usize> = Vec::new();
    let mut foreign_depth = 0usize;

    for caps in TAG_TOKEN.captures_iter(html) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let tag = name.as_str().to_ascii_lowercase();
        let raw_attrs = caps.get(3).map_or("", |m| m.as_str());

        if caps.get(1).map_or(false, |m| m.as_str() == "/") {
            if let Some(depth) = open.iter().rposition(|&index| elements[index].tag == tag) {
                foreign_depth -= count_foreign(&elements, &open[depth..]);
                close_from(&mut elements, &mut open, depth, whole.start(), whole.end());
            }
            continue;
        }

        if foreign_depth == 0 {
            if tag == "li" {
                close_in_scope(&mut elements, &mut open, "li", LIST_ITEM_SCOPE, whole.start());
            }
            if CLOSES_PARAGRAPH.contains(&tag.as_str()) {
                close_in_scope(&mut elements, &mut open, "p", PARAGRAPH_SCOPE, whole.start());
            }
        }

        let is_foreign_root = tag == "svg" || tag == "math";
        // Self-closing syntax only counts inside SVG and MathML.
        let self_closing = (foreign_depth > 0 || is_foreign_root)
            && raw_attrs.trim_end().ends_with('/');
        let childless = self_closing || VOID_TAGS.contains(&tag.as_str());

        elements.push(Element {
            attrs: parse_attrs(raw_attrs),
            tag,
            span: Span {
                start: whole.start(),
                open_end: whole.end(),
                inner_end: whole.end(),
                end: whole.end(),
            },
        });

        if !childless {
            if is_foreign_root {
                foreign_depth += 1;
            }
            open.push(elements.len() - 1);
        }
    }

    close_from(&mut elements, &mut open, 0, html.len(), html.len());
    elements
}

fn count_foreign(elements: &[Element], open: &[usize]) -> usize {
    open.iter()
        .filter(|&&index| matches!(elements[index].tag.as_str(), "svg" | "math"))
        .count()
}

/// Close the innermost open `tag` unless a `boundary` element is open
/// inside it. The closed element ends at `at`.
fn close_in_scope(
    elements: &mut [Element],
    open: &mut Vec<usize>,
    tag: &str,
    boundary: &[&str],
    at: usize,
) {
    for depth in (0..open.len()).rev() {
        let name = elements[open[depth]].tag.as_str();
        if name == tag {
            close_from(elements, open, depth, at, at);
            return;
        }
        if boundary.contains(&name) {
            return;
        }
    }
}

/// Close `open[depth]` with its content ending at `inner_end` and the
/// element at `end`. Elements opened inside it end where its content does.
fn close_from(
    elements: &mut [Element],
    open: &mut Vec<usize>,
    depth: usize,
    inner_end: usize,
    end: usize,
) {
    if depth >= open.len() {
        return;
    }

    for &index in &open[depth + 1..] {
        elements[index].span.inner_end = inner_end;
        elements[index].span.end = inner_end;
    }
    let span = &mut elements[open[depth]].span;
    span.inner_end = inner_end;
    span.end = end;
    open.truncate(depth);
}

/// Attribute names are lowercased and values entity-decoded.
fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR.captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, decode_entities(value)))
        })
        .collect()
}
