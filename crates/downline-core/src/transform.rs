//! Domain tree → display tree conversion.

use crate::model::{DisplayNode, DomainNode, MemberNode, Position};

/// Convert a (possibly absent) domain node into a display node.
///
/// An absent node becomes a placeholder at `position`. A present node keeps
/// its fields and gets both child slots only when at least one leg is
/// populated; the missing leg becomes a placeholder. Leaves get no slots, so
/// the output never grows past the depth the backend returned.
pub fn transform(node: Option<&DomainNode>, position: Position) -> DisplayNode {
    let Some(node) = node else {
        return DisplayNode::Empty { position };
    };

    let children = if node.is_leaf() {
        None
    } else {
        Some([
            transform(node.left.as_deref(), Position::Left),
            transform(node.right.as_deref(), Position::Right),
        ])
    };

    DisplayNode::Occupied(Box::new(MemberNode {
        member_id: node.member_id.clone(),
        name: node.full_name.clone(),
        rank: node.rank.clone(),
        position: node.position.unwrap_or(position),
        is_active: node.is_active(),
        metrics: node.metrics.clone(),
        children,
    }))
}

/// Convert a fetched tree, rooted at [`Position::Root`].
pub fn transform_root(node: Option<&DomainNode>) -> DisplayNode {
    transform(node, Position::Root)
}
