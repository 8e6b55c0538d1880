#![forbid(unsafe_code)]

//! Transition engine: the default policy and the override seam.
//!
//! [`default_transition`] is a pure function of the current state, the
//! action, and a read-only [`ReducerContext`]. Its proposal is handed to the
//! caller's [`StateReducer`] (if any), which returns the changes to apply.
//!
//! # Default Policy
//!
//! | Action | Proposal |
//! |--------|----------|
//! | toggle click (closed), open | open, highlight-on-open |
//! | toggle click (open), close, escape | close, highlight = default |
//! | arrows (open) | step by one, wrapping if circular |
//! | toggle arrows (closed) | open, highlight-on-open forward/backward |
//! | home / end | first / last enabled item, opening from the toggle |
//! | page up / page down | step by [`PAGE_SIZE`], never wrapping |
//! | enter / space / item click | select, close, highlight = default |
//! | blur / tab | close, commit a valid highlight |
//! | mouse leave | highlight = default |
//! | character | extend buffer, type-ahead search |
//! | reset | every field back to its default |
//!
//! Every non-character action also empties a non-empty type-ahead buffer.

use crate::action::{Action, ActionKind, Payload};
use crate::config::ItemFns;
use crate::state::{SelectionState, StateChanges};
use crate::typeahead::find_match;

/// Items skipped by PageUp/PageDown.
pub const PAGE_SIZE: usize = 10;

/// Caller-supplied override of the default transition policy.
///
/// Receives the current state, the action, and the default proposal; returns
/// the changes to apply. Fields missing from the returned changes fall back
/// to the default proposal, so a partial override is safe.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use ftui_select::action::{Action, ActionKind};
/// use ftui_select::config::SelectConfig;
/// use ftui_select::state::{SelectionState, StateChanges};
///
/// // Keep the menu open after a selection.
/// let items = vec!["a".to_string(), "b".to_string()];
/// let config = SelectConfig::new(items).with_state_reducer(
///     |_: &SelectionState<String>, action: &Action<String>, changes: StateChanges<String>| {
///         match action.kind {
///             ActionKind::MenuKeyDownEnter | ActionKind::ItemClick => changes.open(true),
///             _ => changes,
///         }
///     },
/// );
/// # let _ = config;
/// ```
pub trait StateReducer<T> {
    /// Return the changes to apply for `action`.
    fn reduce(
        &mut self,
        state: &SelectionState<T>,
        action: &Action<T>,
        changes: StateChanges<T>,
    ) -> StateChanges<T>;
}

impl<T, F> StateReducer<T> for F
where
    F: FnMut(&SelectionState<T>, &Action<T>, StateChanges<T>) -> StateChanges<T>,
{
    fn reduce(
        &mut self,
        state: &SelectionState<T>,
        action: &Action<T>,
        changes: StateChanges<T>,
    ) -> StateChanges<T> {
        self(state, action, changes)
    }
}

/// Everything the default policy reads besides the state and the action.
pub struct ReducerContext<'a, T> {
    /// The current item sequence.
    pub items: &'a [T],
    pub(crate) fns: &'a ItemFns<T>,
    /// Whether arrow navigation wraps.
    pub circular: bool,
    /// Highlight seeded at construction.
    pub initial_highlighted_index: Option<usize>,
    /// Highlight restored on close and reset.
    pub default_highlighted_index: Option<usize>,
    /// Open state restored on reset.
    pub default_is_open: bool,
    /// Selection restored on reset.
    pub default_selected_item: &'a Option<T>,
}

impl<T> ReducerContext<'_, T> {
    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Display string of the item at `index`, `""` when out of range.
    #[must_use]
    pub fn label_at(&self, index: usize) -> String {
        self.items
            .get(index)
            .map(|item| self.fns.label(item))
            .unwrap_or_default()
    }

    /// Whether the item at `index` is disabled. Out-of-range counts as disabled.
    #[must_use]
    pub fn is_disabled(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_none_or(|item| self.fns.disabled(item, index))
    }

    /// Position of `item` in the sequence under the configured equality.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|candidate| self.fns.same(candidate, item))
    }

    /// Clamp a requested highlight to the sequence.
    #[must_use]
    pub fn clamp(&self, index: Option<usize>) -> Option<usize> {
        let last = self.item_count().checked_sub(1)?;
        index.map(|i| i.min(last))
    }

    fn default_highlight(&self) -> Option<usize> {
        self.default_highlighted_index
            .filter(|&index| !self.is_disabled(index))
    }

    /// First enabled index at or after `start` (or at or before it when
    /// `backwards`), wrapping once when `circular`.
    #[must_use]
    pub fn non_disabled_index(&self, start: usize, backwards: bool, circular: bool) -> Option<usize> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        let start = start.min(count - 1);
        let found = if backwards {
            (0..=start).rev().find(|&i| !self.is_disabled(i))
        } else {
            (start..count).find(|&i| !self.is_disabled(i))
        };
        match found {
            Some(index) => Some(index),
            None if circular => {
                let restart = if backwards { count - 1 } else { 0 };
                self.non_disabled_index(restart, backwards, false)
            }
            None => None,
        }
    }

    /// Move `offset` items from `start`, skipping disabled items.
    ///
    /// With no current highlight, a forward move starts before the first item
    /// and a backward move after the last. Leaving the sequence wraps when
    /// `circular`, otherwise it stops at the edge. When no enabled item is
    /// reachable the highlight stays where it was.
    #[must_use]
    pub fn step(&self, start: Option<usize>, offset: isize, circular: bool) -> Option<usize> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        let last = count as isize - 1;
        let base = match start {
            Some(index) if (index as isize) <= last => index as isize,
            _ if offset > 0 => -1,
            _ => count as isize,
        };

        let mut target = base + offset;
        if target < 0 {
            target = if circular { last } else { 0 };
        } else if target > last {
            target = if circular { 0 } else { last };
        }

        self.non_disabled_index(target as usize, offset < 0, circular)
            .or_else(|| start.filter(|&index| index < count))
    }

    /// Highlight to use when the menu opens.
    ///
    /// Preference order: the initial highlight while the state still carries
    /// it, the default highlight, the selected item's index, then the last
    /// (for `backwards`) or first enabled item.
    #[must_use]
    pub fn highlight_on_open(&self, state: &SelectionState<T>, backwards: bool) -> Option<usize> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        if let Some(initial) = self.initial_highlighted_index
            && state.highlighted_index == Some(initial)
            && !self.is_disabled(initial)
        {
            return Some(initial);
        }
        if let Some(default) = self.default_highlight() {
            return Some(default);
        }
        if let Some(index) = state
            .selected_item
            .as_ref()
            .and_then(|item| self.index_of(item))
        {
            return Some(index);
        }
        if backwards {
            self.non_disabled_index(count - 1, true, false)
        } else {
            self.non_disabled_index(0, false, false)
        }
    }
}

impl<T: Clone> ReducerContext<'_, T> {
    fn item_at(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    /// Selection change committing a valid, enabled highlight.
    fn commit_highlight(&self, state: &SelectionState<T>) -> Option<Option<T>> {
        state
            .highlighted_index
            .filter(|&index| !self.is_disabled(index))
            .map(|index| self.item_at(index))
    }
}

/// The default proposal for `action` from `state`.
#[must_use]
pub fn default_transition<T: Clone>(
    context: &ReducerContext<'_, T>,
    state: &SelectionState<T>,
    action: &Action<T>,
) -> StateChanges<T> {
    use ActionKind as K;

    let close = || {
        StateChanges::new()
            .open(false)
            .highlight(context.default_highlight())
    };
    let open_with = |backwards: bool| {
        StateChanges::new()
            .open(true)
            .highlight(context.highlight_on_open(state, backwards))
    };
    let navigate = |index: Option<usize>| StateChanges::new().highlight(index);

    let mut changes = match action.kind {
        K::ToggleButtonClick | K::FunctionToggleMenu => {
            if state.is_open {
                close()
            } else {
                open_with(false)
            }
        }
        K::FunctionOpenMenu => open_with(false),
        K::FunctionCloseMenu | K::ToggleButtonKeyDownEscape | K::MenuKeyDownEscape => close(),

        K::ToggleButtonKeyDownArrowDown if !state.is_open => open_with(false),
        K::ToggleButtonKeyDownArrowUp if !state.is_open => open_with(true),
        K::ToggleButtonKeyDownArrowUp if matches!(action.payload, Payload::Alt) => {
            let mut changes = close();
            changes.selected_item = context.commit_highlight(state);
            changes
        }
        K::ToggleButtonKeyDownArrowDown | K::MenuKeyDownArrowDown => {
            navigate(context.step(state.highlighted_index, 1, context.circular))
        }
        K::ToggleButtonKeyDownArrowUp | K::MenuKeyDownArrowUp => {
            navigate(context.step(state.highlighted_index, -1, context.circular))
        }

        K::ToggleButtonKeyDownHome | K::MenuKeyDownHome => {
            navigate(context.non_disabled_index(0, false, false)).open(true)
        }
        K::ToggleButtonKeyDownEnd | K::MenuKeyDownEnd => {
            let last = context.item_count().saturating_sub(1);
            navigate(context.non_disabled_index(last, true, false)).open(true)
        }
        K::ToggleButtonKeyDownPageUp | K::MenuKeyDownPageUp => {
            navigate(context.step(state.highlighted_index, -(PAGE_SIZE as isize), false))
                .open(true)
        }
        K::ToggleButtonKeyDownPageDown | K::MenuKeyDownPageDown => {
            navigate(context.step(state.highlighted_index, PAGE_SIZE as isize, false))
                .open(true)
        }

        K::MenuKeyDownEnter | K::MenuKeyDownSpaceButton => {
            let mut changes = close();
            changes.selected_item = context.commit_highlight(state);
            changes
        }
        K::ToggleButtonBlur | K::MenuBlur | K::MenuKeyDownTab => {
            let mut changes = close();
            if state.is_open {
                changes.selected_item = context.commit_highlight(state);
            }
            changes
        }
        K::MenuMouseLeave => navigate(context.default_highlight()),

        K::ItemMouseMove => match action.index() {
            Some(index) if !context.is_disabled(index) => navigate(Some(index)),
            _ => StateChanges::new(),
        },
        K::ItemClick => match action.index() {
            Some(index) if !context.is_disabled(index) => {
                close().select(context.item_at(index))
            }
            _ => StateChanges::new(),
        },

        K::ToggleButtonKeyDownCharacter | K::MenuKeyDownCharacter => {
            let Some(ch) = action.character() else {
                return StateChanges::new();
            };
            let mut buffer = state.typeahead.clone();
            buffer.push(ch);

            let from_toggle = action.kind == K::ToggleButtonKeyDownCharacter;
            let start = if from_toggle && !state.is_open {
                state
                    .selected_item
                    .as_ref()
                    .and_then(|item| context.index_of(item))
            } else {
                state.highlighted_index
            };
            let found = find_match(
                &buffer,
                start,
                context.item_count(),
                |index| context.label_at(index),
                |index| context.is_disabled(index),
            );

            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "select.typeahead",
                buffer = %buffer,
                highlighted_index = ?found
            );

            let changes = StateChanges::new().typeahead(buffer).highlight(found);
            if from_toggle { changes.open(true) } else { changes }
        }

        K::FunctionSetHighlightedIndex => match action.payload {
            Payload::Highlight(index) => navigate(context.clamp(index)),
            _ => StateChanges::new(),
        },
        K::FunctionSelectItem => match &action.payload {
            Payload::Item(item) => StateChanges::new().select(item.clone()),
            _ => StateChanges::new(),
        },
        K::FunctionReset => StateChanges::new()
            .open(context.default_is_open)
            .highlight(context.default_highlight())
            .select(context.default_selected_item.clone())
            .typeahead(""),
        K::FunctionClearTypeahead => StateChanges::new().typeahead(""),
    };

    if !action.kind.is_character() && changes.typeahead.is_none() && !state.typeahead.is_empty() {
        changes.typeahead = Some(String::new());
    }
    changes
}
