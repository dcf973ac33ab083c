//! Tracing initialisation helpers for tests.
//!
//! The subscriber is initialised at most once per process, so it is safe to
//! call [`init_test_tracing`] from every test function.

use tracing_subscriber::EnvFilter;

/// Initialise a tracing subscriber that writes to the test-harness writer
/// and respects `RUST_LOG` (default `debug` for workspace crates).
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn drill_down() {
///     downline_test_utils::tracing_setup::init_test_tracing();
///     // navigation transitions are now visible with --nocapture
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,downline_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
