//! Domain logic for the showroom service.
//!
//! Everything here is free of HTTP and SQL concerns: the car draft model, the
//! configuration wizard state machine and its step editors, the read-only
//! entity views shared by the public catalog and the wizard preview, lead
//! validation, and the object-store seam used to publish images.

pub mod draft;
pub mod error;
pub mod leads;
pub mod search;
pub mod spec_keys;
pub mod steps;
pub mod storage;
pub mod types;
pub mod views;
pub mod wizard;
