//! Deterministic, pattern-based field extraction.
//!
//! Used wherever the AI extractor is unavailable or leaves a field empty. No
//! external calls are made here.

use super::ExtractedFields;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// The CTA value used when the context holds no usable link.
pub const PLACEHOLDER_CTA_URL: &str = "PRX_CLICK_URL";

const SUMMARY_CHAR_LIMIT: usize = 200;
const SUMMARY_SENTENCES: usize = 2;

static HEADLINES_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Headlines\]\s*([\s\S]*?)(?:\n\s*\n|\[Page Content\]|\z)")
        .expect("headline pattern is valid")
});
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["'](https?://[^"']+)["']"#).expect("href pattern is valid")
});
static IMAGE_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["']"#).expect("img pattern is valid")
});
static ALLOWED_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern is valid"));

const PAGE_CONTENT_MARKER: &str = "[Page Content]";

/// Extracts all four fields from a raw context without calling out.
pub fn fallback_extract(context: &str) -> ExtractedFields {
    ExtractedFields {
        headline: fallback_headline(context),
        cta_url: Some(fallback_cta_url(context)),
        images: fallback_images(context),
        summary: fallback_summary(context),
    }
}

/// First non-blank line of the `[Headlines]` section.
pub fn fallback_headline(context: &str) -> Option<String> {
    HEADLINES_SECTION
        .captures(context)
        .and_then(|caps| caps.get(1))
        .and_then(|section| {
            section
                .as_str()
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(String::from)
        })
}

/// First anchor `href` with an allowed scheme, else [`PLACEHOLDER_CTA_URL`].
pub fn fallback_cta_url(context: &str) -> String {
    ANCHOR_HREF
        .captures(context)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLACEHOLDER_CTA_URL.to_string())
}

/// Every `<img src>` with an allowed scheme, in document order.
/// Scheme-relative sources (`//host/...`) are rewritten to `https://`.
pub fn fallback_images(context: &str) -> Vec<String> {
    IMAGE_SRC
        .captures_iter(context)
        .filter_map(|caps| caps.get(1))
        .map(|m| normalize_image_url(m.as_str()))
        .filter(|src| is_allowed_url(src))
        .collect()
}

/// The first sentences of the `[Page Content]` section with markup removed.
pub fn fallback_summary(context: &str) -> Option<String> {
    let start = context.find(PAGE_CONTENT_MARKER)? + PAGE_CONTENT_MARKER.len();
    let text = strip_markup(&context[start..]);
    if text.is_empty() {
        return None;
    }

    let summary = match sentence_end(&text, SUMMARY_SENTENCES) {
        Some(end) => text[..end].to_string(),
        None => text.chars().take(SUMMARY_CHAR_LIMIT).collect(),
    };
    Some(summary.trim().to_string())
}

pub(crate) fn normalize_image_url(src: &str) -> String {
    match src.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => src.to_string(),
    }
}

pub(crate) fn is_allowed_url(url: &str) -> bool {
    ALLOWED_SCHEME.is_match(url)
}

/// Drops tags and collapses whitespace.
fn strip_markup(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text: Vec<&str> = document.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset just past the `count`-th sentence terminator, or past the last
/// one found if there are fewer. `None` when the text has no sentence boundary.
fn sentence_end(text: &str, count: usize) -> Option<usize> {
    let mut found = 0;
    let mut last_end = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars
                .peek()
                .map_or(true, |&(_, next)| next.is_whitespace());
            if at_boundary {
                found += 1;
                last_end = Some(idx + c.len_utf8());
                if found == count {
                    break;
                }
            }
        }
    }

    last_end
}
