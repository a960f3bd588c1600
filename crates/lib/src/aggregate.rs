//! # Result Aggregator
//!
//! Fans the field extractor and the requested generators out over every
//! candidate at once, joins each candidate at a barrier, then validates and
//! deduplicates the assembled ads in retrieval order.
//!
//! Completion order never affects output order: `join_all` yields results in
//! the order the candidates were given.

use crate::{
    extract::{extract_fields, has_required_fields, ExtractedFields},
    generate::Generator,
    tasks::TaskRegistry,
    types::{AdCandidate, DerivedContent, RawCandidate},
};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info};

/// Enriches, validates and deduplicates `candidates`.
pub async fn aggregate(
    tasks: &TaskRegistry,
    candidates: &[RawCandidate],
    generators: &[Generator],
    user_input: &str,
) -> Vec<AdCandidate> {
    let enriched = join_all(
        candidates
            .iter()
            .map(|candidate| enrich_candidate(tasks, candidate, generators, user_input)),
    )
    .await;

    let valid = enriched.into_iter().flatten();
    let ads = dedup_ads(valid);
    info!(
        candidates = candidates.len(),
        ads = ads.len(),
        "Aggregated ad candidates"
    );
    ads
}

/// Runs extraction and generators for one candidate and assembles its ad.
///
/// Returns `None` for candidates without a usable context or without a
/// headline and CTA URL after merging.
pub async fn enrich_candidate(
    tasks: &TaskRegistry,
    candidate: &RawCandidate,
    generators: &[Generator],
    user_input: &str,
) -> Option<AdCandidate> {
    let Some(context) = candidate.raw_context.as_ref() else {
        debug!(id = %candidate.id, "Skipping candidate without usable context");
        return None;
    };

    let (fields, derived) = tokio::join!(
        extract_fields(tasks, context),
        derive_content(tasks, candidate, generators, user_input)
    );

    assemble_ad(candidate, fields, derived)
}

/// Runs the requested generators concurrently and collects their output.
pub async fn derive_content(
    tasks: &TaskRegistry,
    candidate: &RawCandidate,
    generators: &[Generator],
    user_input: &str,
) -> DerivedContent {
    let outputs = join_all(
        generators
            .iter()
            .map(|generator| generator.run(tasks, candidate, user_input)),
    )
    .await;

    let mut derived = DerivedContent::default();
    for output in outputs {
        output.apply_to(&mut derived);
    }
    derived
}

/// Builds the final ad, or `None` when the validity invariant does not hold.
pub fn assemble_ad(
    candidate: &RawCandidate,
    fields: ExtractedFields,
    derived: DerivedContent,
) -> Option<AdCandidate> {
    if !has_required_fields(fields.headline.as_deref(), fields.cta_url.as_deref()) {
        debug!(id = %candidate.id, "Dropping candidate without headline or CTA URL");
        return None;
    }

    Some(AdCandidate {
        headline: fields.headline?.trim().to_string(),
        cta_url: fields.cta_url?.trim().to_string(),
        images: fields.images,
        summary: fields.summary,
        derived,
        advertiser: candidate.advertiser.clone(),
        advertiser_logo_url: candidate.advertiser_logo_url.clone(),
    })
}

/// Keeps the first ad per dedup key, preserving input order.
pub fn dedup_ads(ads: impl IntoIterator<Item = AdCandidate>) -> Vec<AdCandidate> {
    let mut seen = HashSet::new();
    ads.into_iter()
        .filter(|ad| seen.insert(ad.dedup_key()))
        .collect()
}
