//! Tree panel — indented outline of the loaded downline with a selection.

use downline_core::{DisplayNode, Position};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::PanelState;

/// One rendered slot of the outline.
#[derive(Debug, Clone, PartialEq)]
struct TreeRow {
    level: usize,
    position: Position,
    member_id: Option<String>,
    label: String,
    is_active: bool,
}

impl TreeRow {
    fn from_node(level: usize, node: &DisplayNode) -> Self {
        match node.member() {
            Some(member) => {
                let mut label = format!("{} {}", member.member_id, member.name);
                if !member.rank.is_empty() {
                    label.push_str(&format!(" [{}]", member.rank));
                }
                Self {
                    level,
                    position: member.position,
                    member_id: Some(member.member_id.clone()),
                    label,
                    is_active: member.is_active,
                }
            }
            None => Self {
                level,
                position: node.position(),
                member_id: None,
                label: "(empty)".to_string(),
                is_active: false,
            },
        }
    }
}

/// Flattened pre-order view of the display tree.
pub struct TreePanel {
    rows: Vec<TreeRow>,
    selected: usize,
}

impl TreePanel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
        }
    }

    /// Re-flatten after a new tree loads. Selection returns to the root.
    pub fn rebuild(&mut self, tree: Option<&DisplayNode>) {
        self.rows = tree
            .map(|t| {
                t.walk()
                    .map(|(level, node)| TreeRow::from_node(level, node))
                    .collect()
            })
            .unwrap_or_default();
        self.selected = 0;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Member id under the cursor; `None` on a placeholder.
    pub fn selected_member_id(&self) -> Option<&str> {
        self.rows
            .get(self.selected)
            .and_then(|r| r.member_id.as_deref())
    }

    /// Move the cursor to `member_id`. Returns whether it was found.
    pub fn select_member(&mut self, member_id: &str) -> bool {
        match self
            .rows
            .iter()
            .position(|r| r.member_id.as_deref() == Some(member_id))
        {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, highlighted: Option<&str>, title: &str) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);

        if self.rows.is_empty() {
            let empty = Paragraph::new("  (no tree loaded)")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let visible_height = area.height.saturating_sub(2) as usize;
        let skip = self.selected.saturating_sub(visible_height.saturating_sub(1));

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible_height)
            .map(|(index, row)| {
                let slot = match row.position {
                    Position::Root => "",
                    Position::Left => "L ",
                    Position::Right => "R ",
                };
                let mut style = match (&row.member_id, row.is_active) {
                    (None, _) => Style::default().fg(Color::DarkGray),
                    (Some(_), true) => Style::default().fg(Color::Green),
                    (Some(_), false) => Style::default().fg(Color::Gray),
                };
                if row.member_id.is_some() && row.member_id.as_deref() == highlighted {
                    style = style.fg(Color::Black).bg(Color::Yellow);
                }
                if index == self.selected {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }

                let line = Line::from(vec![
                    Span::raw("  ".repeat(row.level)),
                    Span::styled(slot, Style::default().fg(Color::Cyan)),
                    Span::styled(row.label.as_str(), style),
                ]);
                ListItem::new(line)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Default for TreePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState for TreePanel {
    fn scroll_down(&mut self, n: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.selected = (self.selected + n).min(last);
    }

    fn scroll_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.selected = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}
