#![forbid(unsafe_code)]

//! Type-ahead search and its single-shot timer.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐  char (restart)  ┌──────────────────┐  poll past deadline  ┌──────────┐
//! │  Idle    │─────────────────▶│  Armed(deadline) │─────────────────────▶│ Expired  │
//! └──────────┘                  └──────────────────┘                      └──────────┘
//!      ▲                          │   ▲      │ cancel                          │
//!      │                          └───┘      ▼                                 │
//!      │                       char (restart)                                  │
//!      └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The timer never fires on its own: the owner polls it with the current
//! time (see `Select::tick`). A character action restarts the timer inside
//! the same transition that appends to the buffer, so "timer fires" and
//! "new character arrives" can never interleave.

use web_time::{Duration, Instant};

/// Single-shot, restartable deadline guarding the type-ahead buffer.
#[derive(Debug, Clone)]
pub struct TypeaheadTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl TypeaheadTimer {
    /// Create an idle timer with the given window.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// The type-ahead window.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arm (or re-arm) the timer from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` is past the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Find the item to highlight for the type-ahead `buffer`.
///
/// Matching is a case-insensitive prefix test against `label_at(index)`.
/// A buffer of one repeated character (`"a"`, `"aaa"`) cycles through the
/// items starting with that character, searching from just after
/// `highlighted`. A longer buffer searches from `highlighted` itself so the
/// current match is kept while it still matches. Disabled items are skipped.
/// Returns `highlighted` unchanged when nothing matches.
#[must_use]
pub fn find_match(
    buffer: &str,
    highlighted: Option<usize>,
    item_count: usize,
    label_at: impl Fn(usize) -> String,
    is_disabled: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut chars = buffer.chars();
    let Some(first) = chars.next() else {
        return highlighted;
    };
    if item_count == 0 {
        return highlighted;
    }

    let repeated = chars.all(|ch| ch == first);
    let (needle, offset) = if repeated {
        (first.to_lowercase().collect::<String>(), 1)
    } else {
        (buffer.to_lowercase(), 0)
    };
    let start = highlighted.map_or(0, |index| index.saturating_add(offset) % item_count);

    (0..item_count)
        .map(|step| (start + step) % item_count)
        .find(|&index| {
            !is_disabled(index) && label_at(index).to_lowercase().starts_with(&needle)
        })
        .or(highlighted)
}
