#![forbid(unsafe_code)]

//! Selection state, partial state changes, and the controlled-value merge.
//!
//! # Invariants
//!
//! 1. `highlighted_index` is `None` or a valid index for the item sequence the
//!    transition was computed against.
//! 2. A field present in [`ControlledProps`] always takes the caller's value
//!    in the committed state, whatever the proposal contained.
//! 3. `typeahead` is empty after a selection or after the type-ahead window
//!    expires.

use crate::action::Action;

/// The minimal state of one select instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<T> {
    /// Whether the list is visible.
    pub is_open: bool,
    /// Highlighted position in the item sequence, `None` for no highlight.
    pub highlighted_index: Option<usize>,
    /// The committed selection.
    pub selected_item: Option<T>,
    /// Characters typed within the active type-ahead window.
    pub typeahead: String,
}

impl<T> Default for SelectionState<T> {
    fn default() -> Self {
        Self {
            is_open: false,
            highlighted_index: None,
            selected_item: None,
            typeahead: String::new(),
        }
    }
}

/// A partial update over [`SelectionState`]; only present fields apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChanges<T> {
    /// New `is_open`, if changing.
    pub is_open: Option<bool>,
    /// New `highlighted_index`, if changing.
    pub highlighted_index: Option<Option<usize>>,
    /// New `selected_item`, if changing.
    pub selected_item: Option<Option<T>>,
    /// New type-ahead buffer, if changing.
    pub typeahead: Option<String>,
}

impl<T> Default for StateChanges<T> {
    fn default() -> Self {
        Self {
            is_open: None,
            highlighted_index: None,
            selected_item: None,
            typeahead: None,
        }
    }
}

impl<T> StateChanges<T> {
    /// An empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `is_open`.
    #[must_use]
    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    /// Set `highlighted_index`.
    #[must_use]
    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlighted_index = Some(index);
        self
    }

    /// Set `selected_item`.
    #[must_use]
    pub fn select(mut self, item: Option<T>) -> Self {
        self.selected_item = Some(item);
        self
    }

    /// Set the type-ahead buffer.
    #[must_use]
    pub fn typeahead(mut self, buffer: impl Into<String>) -> Self {
        self.typeahead = Some(buffer.into());
        self
    }

    /// Whether no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_open.is_none()
            && self.highlighted_index.is_none()
            && self.selected_item.is_none()
            && self.typeahead.is_none()
    }

    /// Fill every field missing from `self` with the one from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            is_open: self.is_open.or(fallback.is_open),
            highlighted_index: self.highlighted_index.or(fallback.highlighted_index),
            selected_item: self.selected_item.or(fallback.selected_item),
            typeahead: self.typeahead.or(fallback.typeahead),
        }
    }
}

impl<T: Clone> StateChanges<T> {
    /// Apply the present fields on top of `state`.
    #[must_use]
    pub fn apply_to(&self, state: &SelectionState<T>) -> SelectionState<T> {
        SelectionState {
            is_open: self.is_open.unwrap_or(state.is_open),
            highlighted_index: self.highlighted_index.unwrap_or(state.highlighted_index),
            selected_item: match &self.selected_item {
                Some(item) => item.clone(),
                None => state.selected_item.clone(),
            },
            typeahead: match &self.typeahead {
                Some(buffer) => buffer.clone(),
                None => state.typeahead.clone(),
            },
        }
    }

    /// The fields whose value differs between `prev` and `next`.
    ///
    /// `item_eq` decides selection equality.
    #[must_use]
    pub fn diff(
        prev: &SelectionState<T>,
        next: &SelectionState<T>,
        item_eq: impl Fn(&T, &T) -> bool,
    ) -> Self {
        let mut changes = Self::new();
        if prev.is_open != next.is_open {
            changes.is_open = Some(next.is_open);
        }
        if prev.highlighted_index != next.highlighted_index {
            changes.highlighted_index = Some(next.highlighted_index);
        }
        if !same_item(&prev.selected_item, &next.selected_item, &item_eq) {
            changes.selected_item = Some(next.selected_item.clone());
        }
        if prev.typeahead != next.typeahead {
            changes.typeahead = Some(next.typeahead.clone());
        }
        changes
    }
}

/// Selection equality under a caller-supplied item equality.
pub(crate) fn same_item<T>(
    a: &Option<T>,
    b: &Option<T>,
    item_eq: impl Fn(&T, &T) -> bool,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => item_eq(a, b),
        _ => false,
    }
}

/// Externally controlled values. `Some` marks a field as controlled.
///
/// The type-ahead buffer is always engine-owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlledProps<T> {
    /// Controlled `is_open`.
    pub is_open: Option<bool>,
    /// Controlled `highlighted_index`.
    pub highlighted_index: Option<Option<usize>>,
    /// Controlled `selected_item`.
    pub selected_item: Option<Option<T>>,
}

impl<T> Default for ControlledProps<T> {
    fn default() -> Self {
        Self {
            is_open: None,
            highlighted_index: None,
            selected_item: None,
        }
    }
}

impl<T: Clone> ControlledProps<T> {
    /// Whether any field is controlled.
    #[must_use]
    pub fn any(&self) -> bool {
        self.is_open.is_some()
            || self.highlighted_index.is_some()
            || self.selected_item.is_some()
    }

    /// Overlay the controlled values on `state`.
    #[must_use]
    pub fn merge(&self, mut state: SelectionState<T>) -> SelectionState<T> {
        if let Some(is_open) = self.is_open {
            state.is_open = is_open;
        }
        if let Some(index) = self.highlighted_index {
            state.highlighted_index = index;
        }
        if let Some(item) = &self.selected_item {
            state.selected_item = item.clone();
        }
        state
    }
}

/// Delivered to change handlers once per transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeEvent<T> {
    /// The action that caused the transition.
    pub action: Action<T>,
    /// Fields whose proposed value differs from the state before the action.
    pub changes: StateChanges<T>,
    /// The proposed state, before controlled values are overlaid.
    pub state: SelectionState<T>,
}
