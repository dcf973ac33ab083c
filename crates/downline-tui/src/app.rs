//! Core TUI application state and event handling.

use crossterm::event::KeyCode;
use downline_config::AppConfig;
use downline_core::{DomainNode, FetchError, FetchKey, Severity, TreeSession};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::keymap::{Action, KeyMapper};
use crate::panels::{BreadcrumbBar, DetailsPanel, PanelState, TreePanel};

const HELP: &str = " q:quit  j/k:move  gg/G:top/bottom  Enter:drill  Bksp:back  1-9:crumb  0:root  /:search  D:depth  R:retry";

/// What keystrokes currently feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a search query.
    Search(String),
    /// Typing a fetch depth.
    Depth(String),
}

impl InputMode {
    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            InputMode::Normal => None,
            InputMode::Search(buf) | InputMode::Depth(buf) => Some(buf),
        }
    }
}

/// TUI application state.
pub struct App {
    /// Whether the application should quit.
    pub should_quit: bool,

    /// Key mapper for vim-style bindings.
    pub keymap: KeyMapper,

    pub mode: InputMode,

    /// Navigation, loaded tree, highlight, and notifications.
    pub session: TreeSession,

    pub tree_panel: TreePanel,

    gateway_name: String,

    /// Set by retry; the next fetch must bypass any cache.
    refresh_requested: bool,
}

impl App {
    pub fn new(config: &AppConfig, gateway_name: &str) -> Self {
        Self {
            should_quit: false,
            keymap: KeyMapper::new(),
            mode: InputMode::Normal,
            session: TreeSession::from_config(config),
            tree_panel: TreePanel::new(),
            gateway_name: gateway_name.to_string(),
            refresh_requested: false,
        }
    }

    /// Key for the initial load of the viewer's tree.
    pub fn start(&mut self) -> FetchKey {
        self.session.start()
    }

    /// Process a key press. Returns a fetch to start, if any.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<FetchKey> {
        match self.mode {
            InputMode::Normal => {
                let action = self.keymap.resolve(key);
                self.handle_action(action)
            }
            InputMode::Search(_) | InputMode::Depth(_) => self.handle_input(key),
        }
    }

    /// Process a resolved action. Returns a fetch to start, if any.
    pub fn handle_action(&mut self, action: Action) -> Option<FetchKey> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.tree_panel.scroll_down(1),
            Action::SelectPrev => self.tree_panel.scroll_up(1),
            Action::HalfPageDown => self.tree_panel.scroll_down(10),
            Action::HalfPageUp => self.tree_panel.scroll_up(10),
            Action::SelectFirst => self.tree_panel.scroll_to_top(),
            Action::SelectLast => self.tree_panel.scroll_to_bottom(),
            Action::Drill => {
                let member_id = self.tree_panel.selected_member_id()?.to_string();
                return self.session.drill_into(&member_id);
            }
            Action::Back => return self.session.back(),
            Action::Breadcrumb(index) => {
                let member_id = self.session.history().get(index)?.id.clone();
                return self.session.navigate_to_breadcrumb(&member_id);
            }
            Action::ResetToRoot => return Some(self.session.reset_to_root()),
            Action::StartSearch => self.mode = InputMode::Search(String::new()),
            Action::StartDepthEntry => self.mode = InputMode::Depth(String::new()),
            Action::Retry => {
                self.refresh_requested = true;
                return Some(self.session.retry());
            }
            Action::None => {}
        }
        None
    }

    fn handle_input(&mut self, key: KeyCode) -> Option<FetchKey> {
        match key {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => match std::mem::replace(&mut self.mode, InputMode::Normal) {
                InputMode::Search(query) => self.submit_search(&query),
                InputMode::Depth(raw) => return Some(self.session.apply_depth(&raw)),
                InputMode::Normal => {}
            },
            KeyCode::Backspace => {
                if let Some(buf) = self.mode.buffer_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.mode.buffer_mut() {
                    buf.push(c);
                }
            }
            _ => {}
        }
        None
    }

    /// Whether a retry asked for cached results to be dropped. Clears the flag.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    fn submit_search(&mut self, query: &str) {
        if let downline_core::SearchOutcome::Found(member_id) = self.session.search(query) {
            self.tree_panel.select_member(&member_id);
        }
    }

    /// Hand a finished fetch to the session; stale results are dropped.
    pub fn on_fetched(&mut self, key: FetchKey, result: Result<Option<DomainNode>, FetchError>) {
        if self.session.resolve(&key, result) {
            self.tree_panel.rebuild(self.session.tree());
        }
    }

    /// Status bar text and its style.
    pub fn status_line(&self) -> (String, Style) {
        match &self.mode {
            InputMode::Search(buf) => (format!(" /{buf}▏"), Style::default().fg(Color::White)),
            InputMode::Depth(buf) => (
                format!(" depth: {buf}▏  (Enter to apply, Esc to cancel)"),
                Style::default().fg(Color::White),
            ),
            InputMode::Normal => match self.session.notifications().latest() {
                Some(note) => {
                    let color = match note.severity {
                        Severity::Info => Color::Cyan,
                        Severity::Warning => Color::Yellow,
                        Severity::Error => Color::Red,
                    };
                    (
                        format!(
                            " [{:>7.1}s] {}: {}",
                            note.elapsed_secs, note.severity, note.message
                        ),
                        Style::default().fg(color),
                    )
                }
                None => (HELP.to_string(), Style::default().fg(Color::DarkGray)),
            },
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // breadcrumbs
                Constraint::Min(1),    // tree + details
                Constraint::Length(2), // status bar
            ])
            .split(frame.area());

        BreadcrumbBar {
            history: self.session.history(),
            depth: self.session.depth(),
            loading: self.session.is_loading(),
        }
        .render(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let members = self.session.tree().map(|t| t.member_count()).unwrap_or(0);
        let title = format!(" Tree ({members} members, {}) ", self.gateway_name);
        self.tree_panel
            .render(frame, body[0], self.session.highlighted_id(), &title);

        let selected = self
            .tree_panel
            .selected_member_id()
            .and_then(|id| self.session.tree().and_then(|t| t.find(id)));
        DetailsPanel::render(frame, body[1], selected);

        let (text, style) = self.status_line();
        let status = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downline_core::gateway::FixtureGateway;
    use downline_test_utils::fixtures::sample_downline;
    use downline_test_utils::tracing_setup::init_test_tracing;
    use pretty_assertions::assert_eq;

    fn fixture() -> FixtureGateway {
        FixtureGateway::new(Some(sample_downline()))
    }

    fn loaded_app() -> (App, FixtureGateway) {
        let gateway = fixture();
        let mut app = App::new(&AppConfig::default(), "fixture");
        let key = app.start();
        let result = gateway.subtree(&key);
        app.on_fetched(key, result);
        (app, gateway)
    }

    fn press(app: &mut App, gateway: &FixtureGateway, keys: &[KeyCode]) {
        for &key in keys {
            if let Some(fetch) = app.handle_key(key) {
                let result = gateway.subtree(&fetch);
                app.on_fetched(fetch, result);
            }
        }
    }

    fn type_text(app: &mut App, gateway: &FixtureGateway, text: &str) {
        let keys: Vec<KeyCode> = text.chars().map(KeyCode::Char).collect();
        press(app, gateway, &keys);
    }

    #[test]
    fn test_initial_load_fills_tree_panel() {
        let (app, _) = loaded_app();
        assert!(!app.tree_panel.is_empty());
        assert_eq!(app.tree_panel.selected_member_id(), Some("M001"));
    }

    #[test]
    fn test_quit() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('q')]);
        assert!(app.should_quit);
    }

    #[test]
    fn test_drill_and_back() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('j'), KeyCode::Enter]);
        assert_eq!(app.session.navigation().current_root_id(), Some("M002"));
        assert_eq!(app.tree_panel.selected_member_id(), Some("M002"));
        assert_eq!(app.session.history()[0].name, "Priya");

        press(&mut app, &gateway, &[KeyCode::Backspace]);
        assert_eq!(app.session.navigation().current_root_id(), None);
        assert!(app.session.history().is_empty());
    }

    #[test]
    fn test_breadcrumb_digit_and_reset() {
        let (mut app, gateway) = loaded_app();
        // M001 → M002 → M005
        press(&mut app, &gateway, &[KeyCode::Char('j'), KeyCode::Enter]);
        assert!(app.tree_panel.select_member("M005"));
        press(&mut app, &gateway, &[KeyCode::Enter]);
        assert_eq!(app.session.history().len(), 2);

        press(&mut app, &gateway, &[KeyCode::Char('1')]);
        assert_eq!(app.session.history().len(), 1);
        assert_eq!(app.session.navigation().current_root_id(), Some("M002"));

        // Out-of-range crumb is a no-op
        press(&mut app, &gateway, &[KeyCode::Char('5')]);
        assert_eq!(app.session.history().len(), 1);

        press(&mut app, &gateway, &[KeyCode::Char('0')]);
        assert!(app.session.history().is_empty());
    }

    #[test]
    fn test_drill_on_placeholder_is_noop() {
        let gateway = fixture();
        let mut app = App::new(&AppConfig::default(), "fixture");
        // M003 has an empty left slot.
        let key = app.session.drill_into("M003").expect("drill");
        let result = gateway.subtree(&key);
        app.on_fetched(key, result);

        app.tree_panel.scroll_down(1);
        assert_eq!(app.tree_panel.selected_member_id(), None);
        assert_eq!(app.handle_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_search_selects_match() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('/')]);
        type_text(&mut app, &gateway, "bob");
        assert_eq!(app.mode, InputMode::Search("bob".to_string()));
        press(&mut app, &gateway, &[KeyCode::Enter]);

        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.session.highlighted_id(), Some("M003"));
        assert_eq!(app.tree_panel.selected_member_id(), Some("M003"));
    }

    #[test]
    fn test_search_miss_shows_hint() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('/')]);
        type_text(&mut app, &gateway, "tables");
        press(&mut app, &gateway, &[KeyCode::Enter]);

        assert_eq!(app.session.highlighted_id(), None);
        let (text, _) = app.status_line();
        assert!(text.contains("try increasing depth"));
    }

    #[test]
    fn test_depth_entry_refetches() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('D')]);
        type_text(&mut app, &gateway, "45");
        press(&mut app, &gateway, &[KeyCode::Backspace, KeyCode::Enter]);

        assert_eq!(app.session.depth(), 4);
        assert!(app.session.tree().and_then(|t| t.find("M007")).is_some());
    }

    #[test]
    fn test_escape_cancels_input() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('D')]);
        type_text(&mut app, &gateway, "9");
        press(&mut app, &gateway, &[KeyCode::Esc]);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.session.depth(), 3);
    }

    #[test]
    fn test_failed_fetch_then_retry() {
        init_test_tracing();
        let gateway = fixture();
        let mut app = App::new(&AppConfig::default(), "fixture");
        let key = app.start();
        app.on_fetched(key, Err(FetchError::Timeout));
        assert!(app.tree_panel.is_empty());
        let (text, _) = app.status_line();
        assert!(text.contains("retry"));

        press(&mut app, &gateway, &[KeyCode::Char('R')]);
        assert_eq!(app.tree_panel.selected_member_id(), Some("M001"));
        assert!(app.take_refresh());
        assert!(!app.take_refresh());
    }

    #[test]
    fn test_navigation_does_not_request_refresh() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('j'), KeyCode::Enter, KeyCode::Char('0')]);
        assert!(!app.take_refresh());
    }

    #[test]
    fn test_status_line_shows_notification_age() {
        let (mut app, gateway) = loaded_app();
        press(&mut app, &gateway, &[KeyCode::Char('/')]);
        type_text(&mut app, &gateway, "nobody");
        press(&mut app, &gateway, &[KeyCode::Enter]);

        let (text, _) = app.status_line();
        assert!(text.starts_with(" ["), "{text}");
        assert!(text.contains("s] info: "), "{text}");
    }

    #[test]
    fn test_stale_fetch_ignored() {
        init_test_tracing();
        let (mut app, gateway) = loaded_app();
        app.tree_panel.scroll_down(1);
        let stale = app.handle_key(KeyCode::Enter).expect("drill M002");
        let current = app.handle_action(Action::ResetToRoot).expect("reset");

        app.on_fetched(current.clone(), gateway.subtree(&current));
        app.on_fetched(stale.clone(), gateway.subtree(&stale));
        assert_eq!(app.tree_panel.selected_member_id(), Some("M001"));
    }

    #[test]
    fn test_help_shown_without_notifications() {
        let (app, _) = loaded_app();
        let (text, _) = app.status_line();
        assert!(text.contains("q:quit"));
    }
}
