//! # Prompt Templates
//!
//! Default prompt templates for every completion task run by the pipeline.
//! They can be overridden through the server's `config.yml` or `prompt.yml`.

pub mod tasks;
