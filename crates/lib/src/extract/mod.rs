//! # Field Extraction
//!
//! Pulls `headline`, `ctaUrl`, `images` and `summary` out of a candidate's
//! free-form context. The AI extractor runs first; every field it leaves empty
//! is filled from the deterministic [`fallback`] extractor, field by field.

pub mod ai;
pub mod fallback;

use crate::{tasks::TaskRegistry, types::AdContext};
use serde::{Deserialize, Serialize};

pub use ai::extract_with_ai;
pub use fallback::{fallback_extract, PLACEHOLDER_CTA_URL};

/// The four core fields of an ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub headline: Option<String>,
    pub cta_url: Option<String>,
    /// In first-seen order.
    pub images: Vec<String>,
    pub summary: Option<String>,
}

/// Runs the AI extractor and fills its gaps from the fallback.
pub async fn extract_fields(tasks: &TaskRegistry, context: &AdContext) -> ExtractedFields {
    let text = context.as_text();
    let primary = extract_with_ai(tasks, &text).await;
    merge_fields(primary, fallback_extract(&text))
}

/// Per-field "primary else fallback".
pub fn merge_fields(primary: ExtractedFields, fallback: ExtractedFields) -> ExtractedFields {
    ExtractedFields {
        headline: prefer_text(primary.headline, fallback.headline),
        cta_url: prefer_text(primary.cta_url, fallback.cta_url),
        images: prefer_images(primary.images, fallback.images),
        summary: prefer_text(primary.summary, fallback.summary),
    }
}

/// Keeps `primary` when it has non-blank content, otherwise takes `fallback`
/// as-is (which may itself be `None`).
pub fn prefer_text(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary.filter(|value| !value.trim().is_empty()).or(fallback)
}

/// An empty image list from the primary extractor counts as missing.
pub fn prefer_images(primary: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// An ad is only usable with a non-blank headline and CTA URL.
pub fn has_required_fields(headline: Option<&str>, cta_url: Option<&str>) -> bool {
    let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
    present(headline) && present(cta_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(headline: Option<&str>, cta: Option<&str>, images: &[&str]) -> ExtractedFields {
        ExtractedFields {
            headline: headline.map(String::from),
            cta_url: cta.map(String::from),
            images: images.iter().map(|s| s.to_string()).collect(),
            summary: None,
        }
    }

    #[test]
    fn primary_wins_when_present() {
        let merged = merge_fields(
            fields(Some("Primary"), Some("https://p.example"), &["https://p/1.png"]),
            fields(Some("Fallback"), Some("https://f.example"), &["https://f/1.png"]),
        );
        assert_eq!(merged.headline.as_deref(), Some("Primary"));
        assert_eq!(merged.cta_url.as_deref(), Some("https://p.example"));
        assert_eq!(merged.images, vec!["https://p/1.png"]);
    }

    #[test]
    fn blank_primary_takes_fallback_even_when_null() {
        let merged = merge_fields(
            fields(Some("   "), None, &[]),
            fields(None, Some(PLACEHOLDER_CTA_URL), &["https://f/1.png"]),
        );
        assert_eq!(merged.headline, None);
        assert_eq!(merged.cta_url.as_deref(), Some(PLACEHOLDER_CTA_URL));
        assert_eq!(merged.images, vec!["https://f/1.png"]);
    }

    #[test]
    fn required_fields_predicate() {
        assert!(has_required_fields(Some("H"), Some("https://x")));
        assert!(!has_required_fields(Some(" "), Some("https://x")));
        assert!(!has_required_fields(Some("H"), None));
        assert!(!has_required_fields(None, None));
    }
}
