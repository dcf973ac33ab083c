//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `AppConfig::parse()`, covering TOML parsing and
//! the gateway/tree/logging validation rules.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = downline_config::AppConfig::parse(s) {
            // Anything that parsed must also pass validation on its own.
            assert!(config.validate().is_ok());
            assert!(config.tree.default_depth >= 1);
        }
    }
});
