//! Local fixture gateway.
//!
//! Serves subtrees of a full genealogy document held in memory, pruned to
//! the requested depth the same way the backend truncates its responses.
//! Used for offline demos and tests.

use std::path::Path;

use tracing::debug;

use crate::BoxFuture;
use crate::model::DomainNode;
use crate::navigation::FetchKey;

use super::fetch::{FetchError, TreeFetchGateway};
use super::parse_tree_document;

/// Gateway backed by a complete in-memory tree.
#[derive(Debug, Clone)]
pub struct FixtureGateway {
    tree: Option<DomainNode>,
}

impl FixtureGateway {
    /// Serve `tree` (`None` = the viewer has no team).
    pub fn new(tree: Option<DomainNode>) -> Self {
        Self { tree }
    }

    /// Load the full tree from a JSON document on disk.
    pub async fn load(path: &Path) -> Result<Self, FetchError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Fixture(format!("failed to read {}: {e}", path.display())))?;
        let tree = parse_tree_document(&content)?;
        debug!(
            path = %path.display(),
            root = tree.as_ref().map(|n| n.member_id.as_str()),
            "Loaded fixture tree"
        );
        Ok(Self::new(tree))
    }

    /// The pruned subtree for `key`.
    pub fn subtree(&self, key: &FetchKey) -> Result<Option<DomainNode>, FetchError> {
        let Some(tree) = &self.tree else {
            return match &key.root_id {
                Some(id) => Err(FetchError::NotFound(id.clone())),
                None => Ok(None),
            };
        };

        let root = match &key.root_id {
            Some(id) => tree
                .find(id)
                .ok_or_else(|| FetchError::NotFound(id.clone()))?,
            None => tree,
        };
        Ok(Some(root.pruned(key.depth)))
    }
}

impl TreeFetchGateway for FixtureGateway {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        let result = self.subtree(key);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn full_tree() -> DomainNode {
        let mut m002 = DomainNode::new("M002", "Priya");
        m002.left = Some(Box::new(DomainNode::new("M004", "Dev")));
        let mut root = DomainNode::new("M001", "Asha Rao");
        root.left = Some(Box::new(m002));
        root.right = Some(Box::new(DomainNode::new("M003", "Bob Singh")));
        root
    }

    #[test]
    fn test_viewer_root_is_pruned() {
        let gateway = FixtureGateway::new(Some(full_tree()));
        let tree = gateway.subtree(&FetchKey::viewer(2)).unwrap().unwrap();
        assert_eq!(tree.member_id, "M001");
        assert!(tree.left.as_ref().unwrap().is_leaf());
    }

    #[test]
    fn test_drilled_root_subtree() {
        let gateway = FixtureGateway::new(Some(full_tree()));
        let key = FetchKey::new(Some("M002".to_string()), 5);
        let tree = gateway.subtree(&key).unwrap().unwrap();
        assert_eq!(tree.member_id, "M002");
        assert_eq!(tree.left.as_ref().unwrap().member_id, "M004");
    }

    #[test]
    fn test_unknown_root_is_not_found() {
        let gateway = FixtureGateway::new(Some(full_tree()));
        let key = FetchKey::new(Some("M404".to_string()), 3);
        assert_eq!(
            gateway.subtree(&key),
            Err(FetchError::NotFound("M404".to_string()))
        );
    }

    #[test]
    fn test_empty_fixture_has_no_team() {
        let gateway = FixtureGateway::new(None);
        assert_eq!(gateway.subtree(&FetchKey::viewer(3)), Ok(None));
    }

    #[tokio::test]
    async fn test_load_from_file_and_fetch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tree.json");
        let json = serde_json::to_vec(&full_tree()).unwrap();
        tokio::fs::write(&path, json).await.unwrap();

        let gateway = FixtureGateway::load(&path).await.unwrap();
        let tree = gateway.fetch(&FetchKey::viewer(1)).await.unwrap().unwrap();
        assert_eq!(tree.member_id, "M001");
        assert!(tree.is_leaf());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = FixtureGateway::load(Path::new("/nonexistent/tree.json")).await;
        assert!(matches!(result, Err(FetchError::Fixture(_))));
    }
}
