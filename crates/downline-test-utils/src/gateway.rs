//! Scriptable gateway for session and rendering-layer tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use downline_core::gateway::FixtureGateway;
use downline_core::{BoxFuture, DomainNode, FetchError, FetchKey, TreeFetchGateway};

/// Gateway that serves a fixture tree, records every requested key, and
/// can be told to fail the next N fetches.
pub struct RecordingGateway {
    fixture: FixtureGateway,
    requests: Mutex<Vec<FetchKey>>,
    failures: Mutex<VecDeque<FetchError>>,
}

impl RecordingGateway {
    pub fn new(tree: Option<DomainNode>) -> Self {
        Self {
            fixture: FixtureGateway::new(tree),
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Make the next fetch fail with `error` (queued, first in first out).
    pub fn fail_next(&self, error: FetchError) {
        self.failures.lock().expect("failures lock").push_back(error);
    }

    /// Every key fetched so far, in order.
    pub fn requests(&self) -> Vec<FetchKey> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

impl TreeFetchGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(key.clone());
        let failure = self.failures.lock().expect("failures lock").pop_front();
        let result = match failure {
            Some(error) => Err(error),
            None => self.fixture.subtree(key),
        };
        Box::pin(async move { result })
    }
}
