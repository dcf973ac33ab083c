//! Details panel — the selected member's rank, status, and leg metrics.

use downline_core::MemberNode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub struct DetailsPanel;

impl DetailsPanel {
    /// Label/value pairs shown above the leg table.
    pub fn summary(member: &MemberNode) -> Vec<(&'static str, String)> {
        vec![
            ("Member", format!("{} ({})", member.name, member.member_id)),
            (
                "Rank",
                if member.rank.is_empty() {
                    "-".to_string()
                } else {
                    member.rank.clone()
                },
            ),
            ("Position", member.position.to_string()),
            (
                "Status",
                if member.is_active { "active" } else { "inactive" }.to_string(),
            ),
        ]
    }

    /// `(metric, left, right)` rows.
    pub fn leg_rows(member: &MemberNode) -> Vec<(&'static str, String, String)> {
        let m = &member.metrics;
        vec![
            (
                "Team",
                m.left_team_count.to_string(),
                m.right_team_count.to_string(),
            ),
            ("BV", format!("{:.2}", m.left_leg_bv), format!("{:.2}", m.right_leg_bv)),
            (
                "Stars",
                m.left_leg_stars.to_string(),
                m.right_leg_stars.to_string(),
            ),
            (
                "Complete active",
                m.left_complete_active.to_string(),
                m.right_complete_active.to_string(),
            ),
            (
                "Complete inactive",
                m.left_complete_inactive.to_string(),
                m.right_complete_inactive.to_string(),
            ),
        ]
    }

    pub fn render(frame: &mut Frame, area: Rect, member: Option<&MemberNode>) {
        let Some(member) = member else {
            let empty = Paragraph::new("  (empty slot)")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(" Details ").borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);

        let lines: Vec<Line> = Self::summary(member)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                    Span::raw(value),
                ])
            })
            .collect();
        let summary =
            Paragraph::new(lines).block(Block::default().title(" Details ").borders(Borders::ALL));
        frame.render_widget(summary, chunks[0]);

        let rows: Vec<Row> = Self::leg_rows(member)
            .into_iter()
            .map(|(metric, left, right)| {
                Row::new(vec![Cell::from(metric), Cell::from(left), Cell::from(right)])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Min(8),
                Constraint::Min(8),
            ],
        )
        .header(
            Row::new(vec!["", "Left", "Right"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(" Legs ").borders(Borders::ALL));
        frame.render_widget(table, chunks[1]);
    }
}
