//! Common utilities for the statuscheck monitor.
//!
//! This crate provides shared infrastructure used by the parser and the CLI:
//! - **Net** - streaming HTTP retrieval of the status page
//! - **Warning System** - deduplicated diagnostics for recoverable problems

pub mod net;
pub mod warning;

pub use net::{FetchError, FetchOptions, fetch_stream};
