//! Fuzz target for the tree document pipeline.
//!
//! Run with: cargo +nightly fuzz run fuzz_tree_document
//!
//! Input layout: `<depth>\n<query>\n<json body>`. The body goes through
//! `parse_tree_document`, `transform_root`, and `search`; depth goes through
//! `DepthController::normalize`.

#![no_main]

use downline_core::gateway::parse_tree_document;
use downline_core::{DepthController, search, search_all, transform_root};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parts = data.splitn(3, |&b| b == b'\n');
    let depth_raw = parts.next().unwrap_or_default();
    let query = parts.next().unwrap_or_default();
    let body = parts.next().unwrap_or_default();

    if let Ok(raw) = std::str::from_utf8(depth_raw) {
        assert!(DepthController::normalize(raw) >= 1);
    }

    let Ok(domain) = parse_tree_document(body) else {
        return;
    };
    let tree = transform_root(domain.as_ref());
    assert_eq!(tree.is_placeholder(), domain.is_none());

    let Ok(query) = std::str::from_utf8(query) else {
        return;
    };
    let first = search(&tree, query);
    let all = search_all(&tree, query);
    // The first hit is the head of the full match list.
    assert_eq!(
        first.map(|m| m.member_id.as_str()),
        all.first().map(|m| m.member_id.as_str())
    );
});
