//! Tree session — one viewer's navigation, loaded tree, and highlight.
//!
//! The session is the single writer of navigation state. User actions update
//! state synchronously and return the [`FetchKey`] to load; the caller runs
//! the fetch (see [`TreeSession::fetch_with`] or spawn it) and hands the
//! result to [`TreeSession::resolve`]. Results whose key no longer matches
//! the current key are discarded, so the shown tree always belongs to the
//! latest navigation, not the latest fetch to finish.

use downline_config::AppConfig;
use tracing::{debug, info, warn};

use crate::depth::DepthController;
use crate::gateway::{FetchError, TreeFetchGateway};
use crate::model::{DisplayNode, DomainNode};
use crate::navigation::{Breadcrumb, FetchKey, NavigationController, NavigationState};
use crate::notify::{Notifications, Severity};
use crate::search::{self, Query};
use crate::transform::transform_root;

/// Where the session is in its load cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading(FetchKey),
    Loaded(FetchKey),
    /// The latest fetch failed. Navigation is not rolled back.
    Failed { key: FetchKey, error: FetchError },
}

/// Result of a search submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; highlight cleared.
    Cleared,
    /// Member id now highlighted.
    Found(String),
    /// No loaded member matched; highlight cleared.
    NotFound,
}

/// Navigation session for one viewer.
pub struct TreeSession {
    navigation: NavigationController,
    depth: DepthController,
    tree: Option<DisplayNode>,
    load_state: LoadState,
    highlighted_id: Option<String>,
    notifications: Notifications,
}

impl TreeSession {
    pub fn new(depth: DepthController) -> Self {
        Self {
            navigation: NavigationController::new(depth.default_depth()),
            depth,
            tree: None,
            load_state: LoadState::Idle,
            highlighted_id: None,
            notifications: Notifications::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(DepthController::from_config(&config.tree))
    }

    // ── User actions ───────────────────────────────────────────────

    /// Load the viewer's own tree at the default depth.
    pub fn start(&mut self) -> FetchKey {
        let key = self.navigation.fetch_key();
        self.begin(key)
    }

    /// Node click: re-root at `member_id`.
    pub fn drill_into(&mut self, member_id: &str) -> Option<FetchKey> {
        let key = self.navigation.drill_into(member_id, self.tree.as_ref())?;
        Some(self.begin(key))
    }

    /// Breadcrumb click.
    pub fn navigate_to_breadcrumb(&mut self, member_id: &str) -> Option<FetchKey> {
        let key = self.navigation.navigate_to_breadcrumb(member_id)?;
        Some(self.begin(key))
    }

    pub fn reset_to_root(&mut self) -> FetchKey {
        let key = self.navigation.reset_to_root();
        self.begin(key)
    }

    /// One breadcrumb back, or to the viewer's root from the first one.
    pub fn back(&mut self) -> Option<FetchKey> {
        let key = self.navigation.back()?;
        Some(self.begin(key))
    }

    /// Depth apply: normalize raw input and refetch the current root.
    pub fn apply_depth(&mut self, raw: &str) -> FetchKey {
        let depth = DepthController::normalize(raw);
        if let Some(advisory) = self.depth.advisory(depth) {
            warn!(depth, threshold = advisory.threshold, "Large depth requested");
            self.notifications
                .push(Severity::Warning, advisory.to_string());
        }
        let key = self.navigation.set_depth(depth);
        self.begin(key)
    }

    /// Re-issue the fetch for the current key.
    pub fn retry(&mut self) -> FetchKey {
        let key = self.navigation.fetch_key();
        self.begin(key)
    }

    /// Search the loaded tree and update the highlight.
    pub fn search(&mut self, raw_query: &str) -> SearchOutcome {
        let Some(query) = Query::parse(raw_query) else {
            self.highlighted_id = None;
            return SearchOutcome::Cleared;
        };

        let hit = self
            .tree
            .as_ref()
            .and_then(|tree| search::search(tree, query.as_str()))
            .map(|m| m.member_id.clone());

        match hit {
            Some(member_id) => {
                debug!(query = query.as_str(), %member_id, "Search hit");
                self.highlighted_id = Some(member_id.clone());
                SearchOutcome::Found(member_id)
            }
            None => {
                debug!(query = query.as_str(), "Search miss");
                self.highlighted_id = None;
                self.notifications.push(
                    Severity::Info,
                    format!(
                        "\"{}\" not found in the loaded tree; try increasing depth",
                        raw_query.trim()
                    ),
                );
                SearchOutcome::NotFound
            }
        }
    }

    // ── Fetch results ──────────────────────────────────────────────

    /// Apply a finished fetch.
    ///
    /// Returns `false` (and changes nothing) when `key` is stale.
    pub fn resolve(
        &mut self,
        key: &FetchKey,
        result: Result<Option<DomainNode>, FetchError>,
    ) -> bool {
        let current = self.navigation.fetch_key();
        if *key != current {
            debug!(%key, %current, "Discarding stale fetch result");
            return false;
        }

        match result {
            Ok(domain) => {
                let tree = transform_root(domain.as_ref());
                info!(%key, members = tree.member_count(), "Tree loaded");
                self.tree = Some(tree);
                self.highlighted_id = None;
                self.load_state = LoadState::Loaded(key.clone());
            }
            Err(error) => {
                warn!(%key, %error, "Tree fetch failed");
                self.notifications.push(
                    Severity::Error,
                    format!("Failed to load tree for {key}: {error}; retry to try again"),
                );
                self.tree = None;
                self.highlighted_id = None;
                self.load_state = LoadState::Failed {
                    key: key.clone(),
                    error,
                };
            }
        }
        true
    }

    /// Fetch `key` through `gateway` and resolve it in one step.
    ///
    /// Convenient for sequential callers (the CLI, tests); interactive
    /// callers spawn the fetch and call [`resolve`](Self::resolve) later.
    pub async fn fetch_with<G>(&mut self, gateway: &G, key: FetchKey) -> bool
    where
        G: TreeFetchGateway + ?Sized,
    {
        let result = gateway.fetch(&key).await;
        self.resolve(&key, result)
    }

    fn begin(&mut self, key: FetchKey) -> FetchKey {
        debug!(%key, "Fetch requested");
        self.load_state = LoadState::Loading(key.clone());
        key
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The tree loaded under the current key, or the previous tree while a
    /// new one is loading.
    pub fn tree(&self) -> Option<&DisplayNode> {
        self.tree.as_ref()
    }

    pub fn highlighted_id(&self) -> Option<&str> {
        self.highlighted_id.as_deref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading(_))
    }

    pub fn navigation(&self) -> &NavigationState {
        self.navigation.state()
    }

    pub fn history(&self) -> &[Breadcrumb] {
        self.navigation.state().history()
    }

    pub fn depth(&self) -> u32 {
        self.navigation.depth()
    }

    pub fn current_key(&self) -> FetchKey {
        self.navigation.fetch_key()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }
}
