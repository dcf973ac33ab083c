//! User-facing notification feed.
//!
//! A bounded ring buffer of messages the rendering layer shows to the
//! viewer: search misses, fetch failures, depth advisories.

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Seconds since the feed was created.
    pub elapsed_secs: f64,
    pub severity: Severity,
    pub message: String,
}

/// Bounded notification buffer; the oldest entry is evicted when full.
#[derive(Debug)]
pub struct Notifications {
    entries: VecDeque<Notification>,
    capacity: usize,
    start_time: Instant,
}

impl Notifications {
    /// Create a feed holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            start_time: Instant::now(),
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
            severity,
            message: message.into(),
        });
    }

    /// The most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_latest() {
        let mut feed = Notifications::new(10);
        assert!(feed.is_empty());
        assert!(feed.latest().is_none());

        feed.push(Severity::Info, "loaded");
        feed.push(Severity::Error, "failed");
        assert_eq!(feed.len(), 2);
        let latest = feed.latest().unwrap();
        assert_eq!(latest.severity, Severity::Error);
        assert_eq!(latest.message, "failed");
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut feed = Notifications::new(3);
        for msg in ["one", "two", "three", "four"] {
            feed.push(Severity::Info, msg);
        }
        let messages: Vec<&str> = feed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three", "four"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut feed = Notifications::new(0);
        feed.push(Severity::Warning, "a");
        feed.push(Severity::Warning, "b");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.latest().unwrap().message, "b");
    }

    #[test]
    fn test_clear() {
        let mut feed = Notifications::default();
        feed.push(Severity::Info, "x");
        feed.clear();
        assert!(feed.is_empty());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
