//! Tree fetch trait — the seam between navigation and the backend.
//!
//! All tree sources (REST backend, local fixture, cache wrapper) implement
//! this trait. Sessions hand out [`FetchKey`]s; the caller runs the fetch
//! through a gateway and feeds the result back.

use crate::BoxFuture;
use crate::model::DomainNode;
use crate::navigation::FetchKey;

/// Errors from tree fetches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("member not found: {0}")]
    NotFound(String),

    #[error("backend error: {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("request timed out")]
    Timeout,

    #[error("fixture error: {0}")]
    Fixture(String),
}

/// A source of depth-bounded genealogy trees.
///
/// `Ok(None)` means the requested subject has no team.
pub trait TreeFetchGateway: Send + Sync {
    /// Display name (e.g. "http", "fixture").
    fn name(&self) -> &str;

    /// Fetch the subtree for `key`, truncated at `key.depth` levels.
    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>>;

    /// Forget any cached results so the next fetch reaches the backend.
    fn invalidate(&self) {}
}

impl<G: TreeFetchGateway + ?Sized> TreeFetchGateway for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        (**self).fetch(key)
    }

    fn invalidate(&self) {
        (**self).invalidate()
    }
}

impl<G: TreeFetchGateway + ?Sized> TreeFetchGateway for std::sync::Arc<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        (**self).fetch(key)
    }

    fn invalidate(&self) {
        (**self).invalidate()
    }
}
