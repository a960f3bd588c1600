//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `admatch-server`.
//! Enrichment endpoints live in `ads`, backend passthroughs in `passthrough`.

pub mod ads;
pub mod general;
pub mod passthrough;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use ads::*;
pub use general::*;
pub use passthrough::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
