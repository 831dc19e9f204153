//! Aggregation-pipeline fragment injection and stage assembly.
//!
//! An aggregation template renders to text shaped as an array of stage
//! documents, possibly holding fragment entries — conditionally
//! included stage blocks. This crate resolves fragments at the text
//! level, then assembles the final stage array through substitution,
//! optional pruning and the never-empty fallback.

mod assemble;
pub mod error;
mod inject;

pub use assemble::assemble_pipeline;
pub use error::{FragmentError, PipelineError};
pub use inject::{BODY_KEY, CONDITION_KEY, FRAGMENT_KEY, inject_fragments};
