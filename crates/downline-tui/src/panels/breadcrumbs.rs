//! Breadcrumb header — drill-down trail with the keys that jump to it.

use downline_core::Breadcrumb;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Header line showing `Root › 1:Priya › 2:Meera` plus fetch depth.
pub struct BreadcrumbBar<'a> {
    pub history: &'a [Breadcrumb],
    pub depth: u32,
    pub loading: bool,
}

impl BreadcrumbBar<'_> {
    /// Plain-text trail. Only the first nine crumbs get a jump key.
    pub fn trail(&self) -> String {
        let mut trail = String::from("0:Root");
        for (i, crumb) in self.history.iter().enumerate() {
            trail.push_str(" › ");
            if i < 9 {
                trail.push_str(&format!("{}:", i + 1));
            }
            trail.push_str(&crumb.name);
        }
        trail
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "Downline ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.trail()),
            Span::styled(
                format!("  depth {}", self.depth),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if self.loading {
            spans.push(Span::styled(
                "  loading…",
                Style::default().fg(Color::Yellow),
            ));
        }
        let header =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }
}
