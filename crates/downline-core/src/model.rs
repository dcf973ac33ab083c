//! Genealogy data model.
//!
//! [`DomainNode`] is the nullable, nested document the backend returns.
//! [`DisplayNode`] is the always-binary-complete tree the rendering layer
//! consumes; it is produced by [`transform`](crate::transform::transform).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A binary slot under a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Root,
    Left,
    Right,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Root => "root",
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-leg business aggregates carried on every member.
///
/// Absent or `null` fields default to zero. Counts also accept decimal
/// (`3.0`) and negative numbers, rounded and floored at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMetrics {
    #[serde(deserialize_with = "lenient_count")]
    pub left_team_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub right_team_count: u64,
    #[serde(rename = "leftLegBV", deserialize_with = "null_as_default")]
    pub left_leg_bv: f64,
    #[serde(rename = "rightLegBV", deserialize_with = "null_as_default")]
    pub right_leg_bv: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub left_leg_stars: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub right_leg_stars: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub left_complete_active: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub left_complete_inactive: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub right_complete_active: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub right_complete_inactive: u64,
}

/// A member as returned by the tree backend.
///
/// Either child may be absent; the backend truncates the document at the
/// requested depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNode {
    pub member_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Explicit activity flag. Falls back to [`status`](Self::status) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<DomainNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<DomainNode>>,

    #[serde(flatten)]
    pub metrics: TeamMetrics,
}

impl DomainNode {
    /// Create a childless member with the given id and name.
    pub fn new(member_id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Resolved activity: the explicit flag, else `status == "active"`
    /// (case-insensitive), else inactive.
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or_else(|| {
            self.status
                .as_deref()
                .is_some_and(|s| s.to_lowercase() == "active")
        })
    }

    /// Whether neither leg is populated.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Pre-order lookup (self, left subtree, right subtree) by member id.
    pub fn find(&self, member_id: &str) -> Option<&DomainNode> {
        if self.member_id == member_id {
            return Some(self);
        }
        self.left
            .as_deref()
            .and_then(|n| n.find(member_id))
            .or_else(|| self.right.as_deref().and_then(|n| n.find(member_id)))
    }

    /// Copy of this subtree truncated to `depth` levels (1 = this node only).
    pub fn pruned(&self, depth: u32) -> DomainNode {
        let keep_children = depth > 1;
        let prune_child = |child: &Option<Box<DomainNode>>| {
            if keep_children {
                child.as_ref().map(|c| Box::new(c.pruned(depth - 1)))
            } else {
                None
            }
        };
        DomainNode {
            member_id: self.member_id.clone(),
            full_name: self.full_name.clone(),
            rank: self.rank.clone(),
            position: self.position,
            is_active: self.is_active,
            status: self.status.clone(),
            left: prune_child(&self.left),
            right: prune_child(&self.right),
            metrics: self.metrics.clone(),
        }
    }
}

/// The occupied payload of a [`DisplayNode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberNode {
    pub member_id: String,
    pub name: String,
    pub rank: String,
    pub position: Position,
    pub is_active: bool,
    #[serde(flatten)]
    pub metrics: TeamMetrics,
    /// Absent for leaves; otherwise always exactly the left and right slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<[DisplayNode; 2]>,
}

impl MemberNode {
    pub fn left(&self) -> Option<&DisplayNode> {
        self.children.as_ref().map(|[left, _]| left)
    }

    pub fn right(&self) -> Option<&DisplayNode> {
        self.children.as_ref().map(|[_, right]| right)
    }
}

/// A renderable tree slot: either a placeholder or a member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayNode {
    /// A binary slot with no member assigned.
    Empty { position: Position },
    Occupied(Box<MemberNode>),
}

impl DisplayNode {
    pub fn position(&self) -> Position {
        match self {
            DisplayNode::Empty { position } => *position,
            DisplayNode::Occupied(member) => member.position,
        }
    }

    pub fn member(&self) -> Option<&MemberNode> {
        match self {
            DisplayNode::Empty { .. } => None,
            DisplayNode::Occupied(member) => Some(&**member),
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        self.member().map(|m| m.member_id.as_str())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DisplayNode::Empty { .. })
    }

    pub fn children(&self) -> Option<&[DisplayNode; 2]> {
        self.member().and_then(|m| m.children.as_ref())
    }

    /// Pre-order walk over every slot, placeholders included, paired with
    /// its distance from this node.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Occupied members in pre-order.
    pub fn members(&self) -> impl Iterator<Item = &MemberNode> + '_ {
        self.walk().filter_map(|(_, node)| node.member())
    }

    /// Pre-order lookup by member id.
    pub fn find(&self, member_id: &str) -> Option<&MemberNode> {
        self.members().find(|m| m.member_id == member_id)
    }

    /// Number of occupied members.
    pub fn member_count(&self) -> usize {
        self.members().count()
    }

    /// Number of occupied levels (0 for a placeholder).
    pub fn height(&self) -> usize {
        match self {
            DisplayNode::Empty { .. } => 0,
            DisplayNode::Occupied(member) => {
                1 + member
                    .children
                    .as_ref()
                    .map(|[l, r]| l.height().max(r.height()))
                    .unwrap_or(0)
            }
        }
    }
}

/// Iterator returned by [`DisplayNode::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a DisplayNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a DisplayNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        if let Some([left, right]) = node.children() {
            self.stack.push((level + 1, right));
            self.stack.push((level + 1, left));
        }
        Some((level, node))
    }
}

/// Any JSON number (or `null`) as a non-negative count.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Unsigned(u64),
        Signed(i64),
        Decimal(f64),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        None => 0,
        Some(Count::Unsigned(n)) => n,
        Some(Count::Signed(n)) => u64::try_from(n).unwrap_or(0),
        Some(Count::Decimal(f)) if f.is_finite() && f > 0.0 => f.round() as u64,
        Some(Count::Decimal(_)) => 0,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
