#![forbid(unsafe_code)]

//! Transient status channel for assistive technology.
//!
//! When a selection is committed, a one-line message is formatted and held in
//! an auto-clearing status slot (conceptually an ARIA live region). The slot
//! clears itself once its deadline passes so the message is read once.

use web_time::{Duration, Instant};

/// Everything a status message formatter may look at.
#[derive(Debug)]
pub struct StatusContext<'a, T> {
    /// The newly committed selection.
    pub selected_item: Option<&'a T>,
    /// Display string of `selected_item` (empty when absent).
    pub selected_label: &'a str,
    /// Whether the menu is open after the change.
    pub is_open: bool,
    /// Highlight after the change.
    pub highlighted_index: Option<usize>,
    /// Number of items in the current sequence.
    pub item_count: usize,
}

/// Formats the status message for a selection change.
pub type StatusMessageFn<T> = Box<dyn Fn(&StatusContext<'_, T>) -> Option<String>>;

/// The built-in announcement: `"<label> has been selected."`.
#[must_use]
pub fn default_status_message<T>(context: &StatusContext<'_, T>) -> Option<String> {
    context
        .selected_item
        .map(|_| format!("{} has been selected.", context.selected_label))
}

/// Auto-clearing live-region slot.
#[derive(Debug, Clone)]
pub struct Announcer {
    clear_after: Duration,
    message: Option<String>,
    clear_at: Option<Instant>,
}

impl Announcer {
    /// Create an empty announcer whose messages live for `clear_after`.
    #[must_use]
    pub const fn new(clear_after: Duration) -> Self {
        Self {
            clear_after,
            message: None,
            clear_at: None,
        }
    }

    /// Replace the current message and restart its clear deadline.
    pub fn announce(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.clear_at = Some(now + self.clear_after);
    }

    /// The message currently in the live region.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// When the current message clears.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.clear_at
    }

    /// Clear the message if its deadline passed. Returns `true` if cleared.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.clear_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Drop the message immediately.
    pub fn clear(&mut self) {
        self.message = None;
        self.clear_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_uses_label() {
        let item = "Apple";
        let context = StatusContext {
            selected_item: Some(&item),
            selected_label: "Apple",
            is_open: false,
            highlighted_index: None,
            item_count: 3,
        };
        assert_eq!(
            default_status_message(&context).as_deref(),
            Some("Apple has been selected.")
        );
    }

    #[test]
    fn no_message_without_selection() {
        let context: StatusContext<'_, &str> = StatusContext {
            selected_item: None,
            selected_label: "",
            is_open: true,
            highlighted_index: Some(0),
            item_count: 3,
        };
        assert_eq!(default_status_message(&context), None);
    }

    #[test]
    fn message_clears_after_deadline() {
        let mut announcer = Announcer::new(Duration::from_millis(500));
        let t0 = Instant::now();
        announcer.announce("Apple has been selected.", t0);
        assert_eq!(announcer.message(), Some("Apple has been selected."));

        assert!(!announcer.poll(t0 + Duration::from_millis(100)));
        assert!(announcer.poll(t0 + Duration::from_millis(500)));
        assert_eq!(announcer.message(), None);
        assert!(!announcer.poll(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn new_message_restarts_deadline() {
        let mut announcer = Announcer::new(Duration::from_millis(500));
        let t0 = Instant::now();
        announcer.announce("first", t0);
        announcer.announce("second", t0 + Duration::from_millis(400));
        assert!(!announcer.poll(t0 + Duration::from_millis(600)));
        assert_eq!(announcer.message(), Some("second"));
    }
}
