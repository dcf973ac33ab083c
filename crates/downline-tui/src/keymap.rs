//! Vim-style keybinding system.
//!
//! Maps key events to actions. Supports single keys and simple two-key
//! sequences (e.g. `gg` for jump-to-top).

use crossterm::event::KeyCode;

/// An action the TUI can perform in normal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectNext,
    SelectPrev,
    HalfPageDown,
    HalfPageUp,
    SelectFirst,
    SelectLast,
    /// Re-root the tree at the selected member.
    Drill,
    Back,
    /// Jump to the breadcrumb at this zero-based index.
    Breadcrumb(usize),
    ResetToRoot,
    StartSearch,
    StartDepthEntry,
    Retry,
    None,
}

/// Key mapper with support for multi-key sequences.
pub struct KeyMapper {
    /// Pending first key of a two-key sequence (e.g. the first `g` in `gg`).
    pending: Option<KeyCode>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Feed a key code and return the resolved action.
    ///
    /// If the key starts a multi-key sequence, returns `Action::None` and
    /// waits for the next key. If the sequence is invalid, the pending key
    /// is discarded.
    pub fn resolve(&mut self, key: KeyCode) -> Action {
        if let Some(prev) = self.pending.take() {
            return self.resolve_sequence(prev, key);
        }

        match key {
            KeyCode::Char('q') => Action::Quit,

            KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
            KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
            KeyCode::Char('d') => Action::HalfPageDown,
            KeyCode::Char('u') => Action::HalfPageUp,
            KeyCode::Char('G') => Action::SelectLast,

            KeyCode::Enter => Action::Drill,
            KeyCode::Backspace => Action::Back,
            KeyCode::Char('0') => Action::ResetToRoot,
            KeyCode::Char(c @ '1'..='9') => Action::Breadcrumb(c as usize - '1' as usize),

            KeyCode::Char('/') => Action::StartSearch,
            KeyCode::Char('D') => Action::StartDepthEntry,
            KeyCode::Char('R') => Action::Retry,

            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }

            _ => Action::None,
        }
    }

    fn resolve_sequence(&mut self, first: KeyCode, second: KeyCode) -> Action {
        match (first, second) {
            (KeyCode::Char('g'), KeyCode::Char('g')) => Action::SelectFirst,
            // Unknown sequence: interpret the second key as a fresh keypress
            _ => self.resolve(second),
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keys() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('q')), Action::Quit);
        assert_eq!(km.resolve(KeyCode::Char('j')), Action::SelectNext);
        assert_eq!(km.resolve(KeyCode::Char('k')), Action::SelectPrev);
        assert_eq!(km.resolve(KeyCode::Char('G')), Action::SelectLast);
        assert_eq!(km.resolve(KeyCode::Enter), Action::Drill);
        assert_eq!(km.resolve(KeyCode::Backspace), Action::Back);
        assert_eq!(km.resolve(KeyCode::Char('/')), Action::StartSearch);
        assert_eq!(km.resolve(KeyCode::Char('D')), Action::StartDepthEntry);
        assert_eq!(km.resolve(KeyCode::Char('R')), Action::Retry);
    }

    #[test]
    fn test_gg_sequence() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::None);
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::SelectFirst);
    }

    #[test]
    fn test_invalid_sequence_falls_through() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::None);
        assert_eq!(km.resolve(KeyCode::Char('j')), Action::SelectNext);
    }

    #[test]
    fn test_breadcrumb_digits() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('0')), Action::ResetToRoot);
        assert_eq!(km.resolve(KeyCode::Char('1')), Action::Breadcrumb(0));
        assert_eq!(km.resolve(KeyCode::Char('9')), Action::Breadcrumb(8));
    }
}
