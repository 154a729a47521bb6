//! Common utilities for the Magpie selector tooling.
//!
//! This crate provides shared infrastructure used by the other workspace
//! members:
//! - **Warning System** - colored, deduplicated terminal output for
//!   unsupported features and documented limitations

pub mod warning;
