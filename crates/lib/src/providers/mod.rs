//! # Provider Modules
//!
//! External collaborators of the pipeline: the completion/embedding service
//! (`ai`) and the vector search backend (`vector`). Each is reached through a
//! trait so the pipeline can be exercised against scripted doubles.

pub mod ai;
pub mod vector;
