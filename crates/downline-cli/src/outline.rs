//! Plain-text rendering of display trees.

use std::fmt::Write;

use downline_core::{DisplayNode, MemberNode, Position};

/// Render `tree` as an indented box-drawing outline, one slot per line.
///
/// Empty slots are shown so the binary shape stays visible. The member
/// whose id equals `highlight` is marked.
pub fn render(tree: &DisplayNode, highlight: Option<&str>) -> String {
    let mut out = String::new();
    render_into(&mut out, tree, "", "", highlight);
    out
}

fn render_into(
    out: &mut String,
    node: &DisplayNode,
    lead: &str,
    child_lead: &str,
    highlight: Option<&str>,
) {
    out.push_str(lead);
    out.push_str(&label(node, highlight));
    out.push('\n');

    if let Some([left, right]) = node.children() {
        render_into(
            out,
            left,
            &format!("{child_lead}├─ "),
            &format!("{child_lead}│  "),
            highlight,
        );
        render_into(
            out,
            right,
            &format!("{child_lead}└─ "),
            &format!("{child_lead}   "),
            highlight,
        );
    }
}

fn label(node: &DisplayNode, highlight: Option<&str>) -> String {
    let slot = match node.position() {
        Position::Root => "",
        Position::Left => "L ",
        Position::Right => "R ",
    };
    let Some(member) = node.member() else {
        return format!("{slot}(empty)");
    };

    let mut label = format!("{slot}{} {}", member.member_id, member.name);
    if !member.rank.is_empty() {
        let _ = write!(label, " [{}]", member.rank);
    }
    if !member.is_active {
        label.push_str(" (inactive)");
    }
    if highlight == Some(member.member_id.as_str()) {
        label.push_str("  <== match");
    }
    label
}

/// One-line description of a member with its leg totals.
pub fn summary(member: &MemberNode) -> String {
    let m = &member.metrics;
    format!(
        "{} {} | rank: {} | {} | {} | left: {} members, {} BV | right: {} members, {} BV",
        member.member_id,
        member.name,
        if member.rank.is_empty() { "-" } else { &member.rank },
        member.position,
        if member.is_active { "active" } else { "inactive" },
        m.left_team_count,
        m.left_leg_bv,
        m.right_team_count,
        m.right_leg_bv,
    )
}
