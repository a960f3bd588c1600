//! # Query Normalizer
//!
//! Condenses verbose user input into a short search phrase before it is
//! embedded. Any failure returns the original input unchanged.

use crate::tasks::{AdTask, TaskRegistry};
use tracing::{info, warn};

/// Rewrites `input` as a short search query, or returns it unchanged.
pub async fn condense_query(tasks: &TaskRegistry, input: &str) -> String {
    match tasks.run(AdTask::QueryCondense, &[("input", input)]).await {
        Ok(condensed) if !condensed.trim().is_empty() => {
            let condensed = condensed.trim().to_string();
            info!(original = %input, condensed = %condensed, "Condensed query input");
            condensed
        }
        Ok(_) => {
            warn!("Query condensing returned an empty result; using original input");
            input.to_string()
        }
        Err(e) => {
            warn!("Query condensing failed; using original input: {e}");
            input.to_string()
        }
    }
}
