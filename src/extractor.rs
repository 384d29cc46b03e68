//! Field Extractor
//!
//! Every field walks its own strategy chain and the first non-empty value
//! wins, independently of the other fields.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::assembler::AuthorInfo;
use crate::backend::UnitSource;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::locator::CandidateUnit;
use crate::strategies::{self, Strategy};
use crate::text::{parse_count, truncate_chars};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Everything pulled out of one candidate unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub author: AuthorInfo,
    pub content: String,
    pub post_url: String,
    pub timestamp: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// Extract fields from a unit found on the page at `address`.
///
/// `now` is the extraction instant, used when no timestamp is present.
/// Fails only when the unit itself cannot be read.
pub fn extract<U: UnitSource>(
    candidate: &CandidateUnit<U>,
    address: &str,
    config: &ScanConfig,
    now: DateTime<Utc>,
) -> Result<ExtractedFields> {
    let unit = &candidate.unit;
    let full_text = unit.text().ok_or_else(|| ScanError::UnreadableUnit {
        origin: candidate.origin.to_string(),
    })?;

    let resolve_link = |chain: &[Strategy]| {
        first_match(unit, chain)
            .map(|link| resolve(address, &link))
            .unwrap_or_default()
    };

    let author = AuthorInfo {
        name: first_match(unit, strategies::AUTHOR_NAME)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        title: first_match(unit, strategies::AUTHOR_TITLE).unwrap_or_default(),
        profile_url: resolve_link(strategies::AUTHOR_PROFILE),
        image_url: resolve_link(strategies::AUTHOR_IMAGE),
    };

    let content = first_match(unit, strategies::CONTENT)
        .unwrap_or_else(|| truncate_chars(&full_text, config.content_cap).to_string());

    let post_url = first_match(unit, strategies::POST_URL)
        .map(|link| resolve(address, &link))
        .unwrap_or_else(|| address.to_string());

    let timestamp = strategies::TIMESTAMP
        .iter()
        .find_map(|strategy| unit.query(strategy).and_then(|raw| normalize_timestamp(&raw)))
        .unwrap_or_else(|| iso8601(now));

    let count = |chain: &[Strategy]| first_match(unit, chain).map_or(0, |text| parse_count(&text));

    Ok(ExtractedFields {
        author,
        content,
        post_url,
        timestamp,
        likes: count(strategies::LIKES),
        comments: count(strategies::COMMENTS),
        shares: count(strategies::SHARES),
    })
}

fn first_match<U: UnitSource>(unit: &U, chain: &[Strategy]) -> Option<String> {
    chain.iter().find_map(|strategy| unit.query(strategy))
}

/// Resolve a link against the page address the way an anchor's `href`
/// property would. Unresolvable links are kept verbatim.
fn resolve(address: &str, link: &str) -> String {
    Url::parse(address)
        .and_then(|base| base.join(link))
        .map(String::from)
        .unwrap_or_else(|_| link.to_string())
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn normalize_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|parsed| iso8601(parsed.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DomPage, PageSource, PatternPage};
    use crate::config::PageType;
    use crate::locator::locate;
    use chrono::TimeZone;

    const ADDRESS: &str = "https://www.linkedin.com/feed/";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn extract_all<P: PageSource>(page: &P) -> Vec<ExtractedFields> {
        let config = ScanConfig::default();
        locate(page, PageType::Feed, &config)
            .iter()
            .map(|candidate| extract(candidate, page.address(), &config, now()).unwrap())
            .collect()
    }

    fn both(html: &str) -> ExtractedFields {
        let dom = extract_all(&DomPage::parse(html, ADDRESS));
        let pattern = extract_all(&PatternPage::new(html, ADDRESS));
        assert_eq!(dom.len(), 1);
        assert_eq!(dom, pattern);
        dom.into_iter().next().unwrap()
    }

    #[test]
    fn test_full_post() {
        let html = r#"
        <div class="feed-shared-update-v2" data-urn="urn:li:activity:7">
            <div class="update-components-actor">
                <img class="update-components-actor__avatar-image" src="https://media.example.com/ada.jpg">
                <a href="/in/ada-lovelace/">
                    <span class="update-components-actor__name">Ada Lovelace</span>
                </a>
                <span class="update-components-actor__description">Analyst &amp; engineer</span>
                <time datetime="2024-04-30T08:15:00+02:00">1d</time>
            </div>
            <div class="update-components-text"><span dir="ltr">We are hiring a Rust developer.</span></div>
            <a href="https://www.linkedin.com/posts/ada_hiring-activity-7">permalink</a>
            <ul>
                <li class="social-counts-likes">1,204 likes</li>
                <li><button aria-label="37 comments on Ada's post">37</button></li>
                <li class="social-counts-shares">Repost</li>
            </ul>
        </div>
        "#;

        let fields = both(html);
        assert_eq!(fields.author.name, "Ada Lovelace");
        assert_eq!(fields.author.title, "Analyst & engineer");
        assert_eq!(fields.author.profile_url, "https://www.linkedin.com/in/ada-lovelace/");
        assert_eq!(fields.author.image_url, "https://media.example.com/ada.jpg");
        assert_eq!(fields.content, "We are hiring a Rust developer.");
        assert_eq!(fields.post_url, "https://www.linkedin.com/posts/ada_hiring-activity-7");
        assert_eq!(fields.timestamp, "2024-04-30T06:15:00.000Z");
        assert_eq!(fields.likes, 1204);
        assert_eq!(fields.comments, 37);
        assert_eq!(fields.shares, 0);
    }

    #[test]
    fn test_defaults() {
        let html = r#"<div class="feed-shared-update-v2">Just some words without any markup.</div>"#;

        let fields = both(html);
        assert_eq!(fields.author.name, UNKNOWN_AUTHOR);
        assert_eq!(fields.author.title, "");
        assert_eq!(fields.author.profile_url, "");
        assert_eq!(fields.author.image_url, "");
        assert_eq!(fields.content, "Just some words without any markup.");
        assert_eq!(fields.post_url, ADDRESS);
        assert_eq!(fields.timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!((fields.likes, fields.comments, fields.shares), (0, 0, 0));
    }

    #[test]
    fn test_fields_fall_through_independently() {
        let html = r#"
        <div class="feed-shared-update-v2">
            <span class="update-components-actor__name"> </span>
            <span class="feed-shared-actor__name">Grace Hopper</span>
            <span class="entity-result__primary-subtitle">Rear Admiral</span>
            <p class="feed-shared-text">Compilers all the way down.</p>
            <a href="/activity/5/">activity</a>
            <a href="https://www.linkedin.com/company/navy/">company</a>
            <time datetime="yesterday">yesterday</time>
            <span data-timestamp="2024-01-02T03:04:05Z"></span>
            <span class="feed-shared-social-action-bar__comments">12 comments</span>
        </div>
        "#;

        let fields = both(html);
        assert_eq!(fields.author.name, "Grace Hopper");
        assert_eq!(fields.author.title, "Rear Admiral");
        assert_eq!(fields.author.profile_url, "");
        assert_eq!(fields.content, "Compilers all the way down.");
        assert_eq!(fields.post_url, "https://www.linkedin.com/activity/5/");
        assert_eq!(fields.timestamp, "2024-01-02T03:04:05.000Z");
        assert_eq!(fields.comments, 12);
    }

    #[test]
    fn test_named_entities_decode_alike() {
        let html = r#"<div class="feed-shared-update-v2">
            <span class="feed-shared-actor__name">Jos&eacute; Mart&iacute;n</span>
            <div class="update-components-text">It&rsquo;s a React role &mdash; apply&hellip;</div>
        </div>"#;

        let fields = both(html);
        assert_eq!(fields.author.name, "Jos\u{e9} Mart\u{ed}n");
        assert_eq!(fields.content, "It\u{2019}s a React role \u{2014} apply\u{2026}");
    }

    #[test]
    fn test_content_falls_back_to_capped_text() {
        let body = "x".repeat(800);
        let html = format!(r#"<div class="feed-shared-update-v2">{}</div>"#, body);
        let fields = both(&html);
        assert_eq!(fields.content.chars().count(), 500);
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(iso8601(now()), "2024-05-01T12:00:00.000Z");
        assert_eq!(normalize_timestamp("not a date"), None);
    }
}
