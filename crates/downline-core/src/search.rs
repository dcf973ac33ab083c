//! In-memory member search over a loaded display tree.
//!
//! Matching is a case-insensitive substring test against the member's name
//! or id. Placeholders never match. Traversal is pre-order (node, left,
//! right) and the first hit wins; there is no ranking.

use crate::model::{DisplayNode, MemberNode};

/// A normalized, non-blank search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    /// Normalize raw user input. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, member: &MemberNode) -> bool {
        member.name.to_lowercase().contains(&self.needle)
            || member.member_id.to_lowercase().contains(&self.needle)
    }
}

/// First member in pre-order whose name or id contains `query`.
///
/// Returns `None` both for a blank query and for a miss; callers that need
/// to tell them apart should check [`Query::parse`] first.
pub fn search<'a>(tree: &'a DisplayNode, query: &str) -> Option<&'a MemberNode> {
    let query = Query::parse(query)?;
    tree.members().find(|m| query.matches(m))
}

/// Every matching member, in pre-order.
pub fn search_all<'a>(tree: &'a DisplayNode, query: &str) -> Vec<&'a MemberNode> {
    match Query::parse(query) {
        Some(query) => tree.members().filter(|m| query.matches(m)).collect(),
        None => Vec::new(),
    }
}
