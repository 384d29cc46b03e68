//! Text helpers shared by both backends

use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCRIPT_OR_STYLE: Regex =
        Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    // Thousands groups only count when every group has three digits.
    static ref COUNT: Regex = Regex::new(r"\d{1,3}(?:,\d{3})+|\d+").unwrap();
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an HTML fragment, the way a DOM's text content reads
/// after whitespace collapsing.
pub fn strip_tags(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let without_comments = COMMENT.replace_all(&without_code, " ");
    let text = TAG.replace_all(&without_comments, " ");
    collapse_whitespace(&decode_entities(&text))
}

/// Decode character references (named, decimal and hex) the way an
/// HTML parser does for text runs and attribute values.
pub fn decode_entities(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// Blank out script, style and comment regions with spaces of the same
/// byte length, so markup inside them is never scanned and offsets into the
/// result still index the original text.
pub fn mask_non_content(html: &str) -> String {
    let mut masked = html.to_string();
    for region in [&*SCRIPT_OR_STYLE, &*COMMENT] {
        let ranges: Vec<_> = region.find_iter(&masked).map(|m| m.range()).collect();
        for range in ranges {
            let blank = " ".repeat(range.len());
            masked.replace_range(range, &blank);
        }
    }
    masked
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse an engagement counter such as "1,204 likes" or "17 comments".
///
/// Takes the first run of digits, reading comma thousands groups as one
/// number only when the grouping is well formed all the way through
/// ("1,2345" reads as 1). Absent, non-numeric, or overflowing text is 0.
pub fn parse_count(text: &str) -> u64 {
    let Some(m) = COUNT.find(text) else {
        return 0;
    };

    let digits = m.as_str();
    let run = if digits.contains(',') && continues_number(&text[m.end()..]) {
        digits.split(',').next().unwrap_or(digits)
    } else {
        digits
    };

    run.replace(',', "").parse::<u64>().unwrap_or(0)
}

fn continues_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(',') => chars.next().map_or(false, |c| c.is_ascii_digit()),
        _ => false,
    }
}
