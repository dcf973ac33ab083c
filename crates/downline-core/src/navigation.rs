//! Drill-down navigation and breadcrumb history.
//!
//! The [`NavigationController`] is the only writer of [`NavigationState`].
//! Every mutation returns the [`FetchKey`] the caller must fetch next (or
//! `None` when nothing changed); the controller never performs I/O itself.
//!
//! ```text
//!            drill_into / navigate_to_breadcrumb
//!   ┌────────┐ ─────────────────────────────▶ ┌─────────┐
//!   │ AtRoot │                                │ Drilled │ ◀─┐ drill_into /
//!   └────────┘ ◀───────────────────────────── └─────────┘ ──┘ breadcrumb
//!                 reset_to_root / back
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::model::DisplayNode;

/// Identifies one fetch: which root, how deep.
///
/// A result is only applied if its key still equals the controller's
/// current key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchKey {
    /// `None` means the viewer's own root.
    pub root_id: Option<String>,
    pub depth: u32,
}

impl FetchKey {
    pub fn new(root_id: Option<String>, depth: u32) -> Self {
        Self { root_id, depth }
    }

    /// Key for the viewer's own tree.
    pub fn viewer(depth: u32) -> Self {
        Self::new(None, depth)
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root_id {
            Some(id) => write!(f, "{id}@{}", self.depth),
            None => write!(f, "<viewer>@{}", self.depth),
        }
    }
}

/// A previously visited root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub name: String,
}

/// The two navigation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// Showing the viewer's own tree; history is empty.
    AtRoot,
    /// Re-rooted at a descendant; history is non-empty.
    Drilled,
}

/// Current root plus breadcrumb history. Updated as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    current_root_id: Option<String>,
    history: Vec<Breadcrumb>,
}

impl NavigationState {
    pub fn current_root_id(&self) -> Option<&str> {
        self.current_root_id.as_deref()
    }

    pub fn history(&self) -> &[Breadcrumb] {
        &self.history
    }

    pub fn phase(&self) -> NavPhase {
        if self.current_root_id.is_some() {
            NavPhase::Drilled
        } else {
            NavPhase::AtRoot
        }
    }
}

/// Owns [`NavigationState`] and the requested depth.
#[derive(Debug, Clone)]
pub struct NavigationController {
    state: NavigationState,
    depth: u32,
}

impl NavigationController {
    pub fn new(depth: u32) -> Self {
        Self {
            state: NavigationState::default(),
            depth,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn phase(&self) -> NavPhase {
        self.state.phase()
    }

    /// The key the currently displayed tree must have been fetched under.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey::new(self.state.current_root_id.clone(), self.depth)
    }

    /// Re-root at `member_id`.
    ///
    /// The breadcrumb name comes from a pre-order lookup in `loaded`; if the
    /// member is not in the loaded tree the id itself is used. No-op when
    /// `member_id` is already the current root.
    pub fn drill_into(&mut self, member_id: &str, loaded: Option<&DisplayNode>) -> Option<FetchKey> {
        if self.state.current_root_id.as_deref() == Some(member_id) {
            return None;
        }

        let name = loaded
            .and_then(|tree| tree.find(member_id))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| member_id.to_string());

        let mut history = self.state.history.clone();
        history.push(Breadcrumb {
            id: member_id.to_string(),
            name,
        });
        self.commit(Some(member_id.to_string()), history);
        Some(self.fetch_key())
    }

    /// Jump back to a breadcrumb, dropping every entry after it.
    ///
    /// Ids not present in the history are ignored.
    pub fn navigate_to_breadcrumb(&mut self, member_id: &str) -> Option<FetchKey> {
        let Some(index) = self.state.history.iter().position(|b| b.id == member_id) else {
            debug!(member_id, "Breadcrumb not in history, ignoring");
            return None;
        };

        let history = self.state.history[..=index].to_vec();
        self.commit(Some(member_id.to_string()), history);
        Some(self.fetch_key())
    }

    /// Return to the viewer's own tree.
    pub fn reset_to_root(&mut self) -> FetchKey {
        self.commit(None, Vec::new());
        self.fetch_key()
    }

    /// Step one breadcrumb back; from the first breadcrumb this resets to
    /// the viewer's root. No-op when already at the root.
    pub fn back(&mut self) -> Option<FetchKey> {
        match self.state.history.len() {
            0 => None,
            1 => Some(self.reset_to_root()),
            n => {
                let previous = self.state.history[n - 2].id.clone();
                self.navigate_to_breadcrumb(&previous)
            }
        }
    }

    /// Change the fetch depth; history is left untouched.
    pub fn set_depth(&mut self, depth: u32) -> FetchKey {
        self.depth = depth;
        self.fetch_key()
    }

    fn commit(&mut self, current_root_id: Option<String>, history: Vec<Breadcrumb>) {
        debug!(
            from = ?self.state.current_root_id,
            to = ?current_root_id,
            history_len = history.len(),
            "Navigation transition"
        );
        self.state = NavigationState {
            current_root_id,
            history,
        };
    }
}
