//! Genealogy tree fixtures.
//!
//! [`NodeBuilder`] builds [`DomainNode`] trees fluently; [`sample_downline`]
//! is the shared three-level tree most tests navigate:
//!
//! ```text
//!                    M001 Asha Rao
//!              ┌───────────┴───────────┐
//!          M002 Priya             M003 Bob Singh
//!        ┌─────┴─────┐                 └─────┐
//!    M004 Dev    M005 Meera             M006 Kiran
//!                      └─────┐
//!                        M007 Bobby Tables
//! ```

use std::path::PathBuf;

use downline_core::{DomainNode, Position};
use tempfile::TempDir;

/// Fluent builder for [`DomainNode`].
pub struct NodeBuilder {
    node: DomainNode,
}

impl NodeBuilder {
    pub fn new(member_id: &str, full_name: &str) -> Self {
        Self {
            node: DomainNode::new(member_id, full_name),
        }
    }

    pub fn rank(mut self, rank: &str) -> Self {
        self.node.rank = rank.to_string();
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.node.position = Some(position);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.node.is_active = Some(active);
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.node.status = Some(status.to_string());
        self
    }

    pub fn team_counts(mut self, left: u64, right: u64) -> Self {
        self.node.metrics.left_team_count = left;
        self.node.metrics.right_team_count = right;
        self
    }

    pub fn leg_bv(mut self, left: f64, right: f64) -> Self {
        self.node.metrics.left_leg_bv = left;
        self.node.metrics.right_leg_bv = right;
        self
    }

    pub fn left(mut self, child: NodeBuilder) -> Self {
        self.node.left = Some(Box::new(child.position(Position::Left).build()));
        self
    }

    pub fn right(mut self, child: NodeBuilder) -> Self {
        self.node.right = Some(Box::new(child.position(Position::Right).build()));
        self
    }

    pub fn build(self) -> DomainNode {
        self.node
    }
}

/// The shared seven-member sample tree (see module docs).
pub fn sample_downline() -> DomainNode {
    NodeBuilder::new("M001", "Asha Rao")
        .rank("Diamond")
        .position(Position::Root)
        .status("Active")
        .team_counts(4, 2)
        .leg_bv(5400.0, 2100.5)
        .left(
            NodeBuilder::new("M002", "Priya")
                .rank("Gold")
                .active(true)
                .team_counts(1, 2)
                .left(NodeBuilder::new("M004", "Dev").status("inactive"))
                .right(
                    NodeBuilder::new("M005", "Meera")
                        .active(true)
                        .right(NodeBuilder::new("M007", "Bobby Tables")),
                ),
        )
        .right(
            NodeBuilder::new("M003", "Bob Singh")
                .rank("Silver")
                .active(true)
                .right(NodeBuilder::new("M006", "Kiran")),
        )
        .build()
}

/// A tree document written to a temporary JSON file.
///
/// The temp directory is deleted when this value is dropped.
pub struct FixtureFile {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl FixtureFile {
    /// Serialize `tree` to `tree.json` in a fresh temp directory.
    pub fn write(tree: &DomainNode) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("tree.json");
        let json = serde_json::to_vec_pretty(tree).expect("failed to serialize tree");
        std::fs::write(&path, json).expect("failed to write fixture tree");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// The path as a string, for config builders.
    pub fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}
