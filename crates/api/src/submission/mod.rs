//! Publishing a finished wizard draft into the catalog.
//!
//! - [`orchestrator`] -- the ordered write batch and its failure policy.

pub mod orchestrator;

pub use orchestrator::{submit, SubmissionReport};
