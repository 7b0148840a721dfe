//! Movement-log client for the Google Apps Script endpoint.
//!
//! This crate is the single source of truth for the script wire contract:
//! JSONP-wrapped reads keyed by DNI, JSON POST appends, and the degraded
//! behavior when the endpoint misbehaves.

mod client;

pub use client::{SheetsClient, SubmitOutcome};
