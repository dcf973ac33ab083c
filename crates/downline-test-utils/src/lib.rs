#![deny(unsafe_code)]

//! Shared test utilities for the downline workspace.
//!
//! Provides genealogy tree builders, a recording gateway, config builders,
//! and tracing helpers so that individual crate tests stay concise and
//! consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! downline-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod gateway;
pub mod tracing_setup;
