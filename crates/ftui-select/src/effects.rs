#![forbid(unsafe_code)]

//! Post-commit side effects: scroll-into-view and focus return.
//!
//! Effects are planned when a transition commits and applied later, by
//! [`Select::flush_effects`], once the renderer has produced output for the
//! new state. Planning coalesces: a newer scroll request replaces an older
//! one, so the last committed highlight wins.
//!
//! # Failure Modes
//!
//! - A focus or scroll request the environment rejects is logged (with the
//!   `tracing` feature) and dropped; effects are best-effort.
//! - A scroll while the menu ref slot is unbound is dropped the same way.
//! - Focus return is skipped when the toggle control already holds focus.
//!
//! [`Select::flush_effects`]: crate::select::Select::flush_effects

use crate::action::ActionKind;
use crate::environment::Environment;
use crate::error::{Result, SelectError};
use crate::props::SelectIds;
use crate::state::SelectionState;

/// Arguments for a scroll routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest<'a> {
    /// Index of the highlighted item.
    pub index: usize,
    /// Element id of the highlighted item.
    pub item_id: &'a str,
    /// Element id of the scrollable menu.
    pub menu_id: &'a str,
}

/// Caller-supplied scroll routine, e.g. scroll-by-index for virtualized lists.
pub type ScrollIntoViewFn =
    Box<dyn FnMut(&ScrollRequest<'_>, &mut dyn Environment) -> Result<()>>;

/// Effects waiting for the next flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingEffects {
    scroll_to: Option<usize>,
    restore_focus: bool,
}

impl PendingEffects {
    /// Index waiting to be scrolled into view.
    #[must_use]
    pub const fn scroll_to(&self) -> Option<usize> {
        self.scroll_to
    }

    /// Whether focus returns to the toggle control on flush.
    #[must_use]
    pub const fn restore_focus(&self) -> bool {
        self.restore_focus
    }

    /// Whether nothing is pending.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scroll_to.is_none() && !self.restore_focus
    }

    /// Record the effects of a committed transition from `prev` to `next`.
    pub fn plan<T>(
        &mut self,
        prev: &SelectionState<T>,
        next: &SelectionState<T>,
        kind: ActionKind,
    ) {
        if prev.highlighted_index != next.highlighted_index {
            // The pointer is already over the item it highlighted.
            self.scroll_to = match next.highlighted_index {
                Some(index) if next.is_open && kind != ActionKind::ItemMouseMove => Some(index),
                _ => None,
            };
        }
        if prev.is_open && !next.is_open {
            self.scroll_to = None;
            self.restore_focus = !kind.is_focus_loss();
        } else if next.is_open {
            self.restore_focus = false;
        }
    }

    /// Take the pending effects, leaving nothing queued.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Perform the effects through `environment`.
    ///
    /// Scrolling needs the menu ref slot bound to a container; without it
    /// the scroll is dropped.
    pub(crate) fn apply(
        self,
        ids: &SelectIds,
        menu_bound: bool,
        environment: &mut dyn Environment,
        scroll_override: Option<&mut ScrollIntoViewFn>,
    ) {
        if let Some(index) = self.scroll_to {
            let item_id = ids.item_id(index);
            let request = ScrollRequest {
                index,
                item_id: &item_id,
                menu_id: &ids.menu_id,
            };
            let result = match scroll_override {
                _ if !menu_bound => Err(SelectError::MenuRefNotBound {
                    menu_id: ids.menu_id.clone(),
                }),
                Some(scroll) => scroll(&request, &mut *environment),
                None => environment.scroll_into_view(&item_id, &ids.menu_id),
            };
            report("scroll_into_view", result);
        }
        if self.restore_focus
            && environment.active_element().as_deref() != Some(ids.toggle_button_id.as_str())
        {
            report("focus", environment.focus(&ids.toggle_button_id));
        }
    }
}

fn report(effect: &'static str, result: Result<()>) {
    #[cfg(feature = "tracing")]
    match &result {
        Ok(()) => tracing::debug!(message = "select.effect", effect),
        Err(error) => tracing::warn!(message = "select.effect", effect, error = %error),
    }
    let _ = (effect, result);
}
