#![forbid(unsafe_code)]

//! Event-to-action mapping.
//!
//! Translates a raw [`InputEventKind`] delivered to one [`ElementRole`] into
//! the semantic [`Action`] it stands for. Mapping is a pure function of the
//! event and a few [`MapperState`] flags; it never touches the selection
//! state itself.
//!
//! # Key Table
//!
//! | Element | Condition | Key | Action |
//! |---------|-----------|-----|--------|
//! | toggle | closed | Enter, Space | `ToggleButtonClick` |
//! | toggle | open | Enter | `MenuKeyDownEnter` |
//! | toggle | open | Space | `MenuKeyDownSpaceButton` |
//! | toggle | always | Down / Up | `ToggleButtonKeyDownArrowDown` / `ArrowUp` (+Alt payload) |
//! | toggle | always | Home, End, PageUp, PageDown, Esc | matching `ToggleButtonKeyDown*` |
//! | menu | always | arrows, Home, End, PageUp, PageDown, Esc, Enter | matching `MenuKeyDown*` |
//! | menu | always | Space | `MenuKeyDownSpaceButton` |
//! | menu | always | Tab, BackTab | `MenuKeyDownTab` |
//! | any | type-ahead active | Space | `*KeyDownCharacter(' ')` |
//! | any | always | printable char | `*KeyDownCharacter` |
//!
//! Only `Press` and `Repeat` key events map; releases are ignored.

use crate::action::{Action, ActionKind, Payload};
use crate::event::{ElementRole, InputEventKind, KeyCode, KeyEvent, KeyEventKind};

/// Flags the mapper consults besides the event itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperState {
    /// The menu is open.
    pub is_open: bool,
    /// The type-ahead buffer is non-empty.
    pub typeahead_active: bool,
    /// Currently highlighted item.
    pub highlighted_index: Option<usize>,
    /// A blur event moved focus to another element of the same widget.
    pub blur_within_widget: bool,
}

/// Map `event`, delivered to `role`, to an action.
///
/// Returns `None` when the event has no meaning for that element.
///
/// ```
/// use ftui_select::action::ActionKind;
/// use ftui_select::event::{ElementRole, InputEventKind, KeyCode, KeyEvent};
/// use ftui_select::mapper::{MapperState, map_event};
///
/// let state = MapperState { is_open: true, ..MapperState::default() };
/// let event = InputEventKind::Key(KeyEvent::new(KeyCode::Down));
/// let action = map_event::<&str>(ElementRole::Menu, &event, &state);
/// assert_eq!(action.map(|a| a.kind), Some(ActionKind::MenuKeyDownArrowDown));
/// ```
#[must_use]
pub fn map_event<T>(
    role: ElementRole,
    event: &InputEventKind,
    state: &MapperState,
) -> Option<Action<T>> {
    match (role, event) {
        (ElementRole::Label, _) => None,

        (ElementRole::ToggleButton, InputEventKind::Key(key)) => map_toggle_key(key, state),
        (ElementRole::ToggleButton, InputEventKind::Click) => {
            Some(Action::new(ActionKind::ToggleButtonClick))
        }
        (ElementRole::ToggleButton, InputEventKind::Blur { .. }) if !state.blur_within_widget => {
            Some(Action::new(ActionKind::ToggleButtonBlur))
        }

        (ElementRole::Menu, InputEventKind::Key(key)) => map_menu_key(key, state),
        (ElementRole::Menu, InputEventKind::Blur { .. }) if !state.blur_within_widget => {
            Some(Action::new(ActionKind::MenuBlur))
        }
        (ElementRole::Menu, InputEventKind::PointerLeave) => {
            Some(Action::new(ActionKind::MenuMouseLeave))
        }

        // Moving within the already highlighted item is not a change.
        (ElementRole::Item(index), InputEventKind::PointerMove)
            if state.highlighted_index != Some(index) =>
        {
            Some(Action::with_payload(
                ActionKind::ItemMouseMove,
                Payload::Index(index),
            ))
        }
        (ElementRole::Item(index), InputEventKind::Click) => Some(Action::with_payload(
            ActionKind::ItemClick,
            Payload::Index(index),
        )),

        _ => None,
    }
}

fn pressed(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}

/// Space while typing is part of the search string.
fn typed_char(key: &KeyEvent, state: &MapperState) -> Option<char> {
    match key.typeahead_char() {
        Some(' ') if !state.typeahead_active => None,
        other => other,
    }
}

fn map_toggle_key<T>(key: &KeyEvent, state: &MapperState) -> Option<Action<T>> {
    if !pressed(key) {
        return None;
    }
    if let Some(ch) = typed_char(key, state) {
        return Some(Action::with_payload(
            ActionKind::ToggleButtonKeyDownCharacter,
            Payload::Character(ch),
        ));
    }

    let kind = match key.code {
        KeyCode::Enter if state.is_open => ActionKind::MenuKeyDownEnter,
        KeyCode::Char(' ') if state.is_open => ActionKind::MenuKeyDownSpaceButton,
        KeyCode::Enter | KeyCode::Char(' ') => ActionKind::ToggleButtonClick,
        KeyCode::Down => ActionKind::ToggleButtonKeyDownArrowDown,
        KeyCode::Up if key.alt() => {
            return Some(Action::with_payload(
                ActionKind::ToggleButtonKeyDownArrowUp,
                Payload::Alt,
            ));
        }
        KeyCode::Up => ActionKind::ToggleButtonKeyDownArrowUp,
        KeyCode::Home => ActionKind::ToggleButtonKeyDownHome,
        KeyCode::End => ActionKind::ToggleButtonKeyDownEnd,
        KeyCode::PageUp => ActionKind::ToggleButtonKeyDownPageUp,
        KeyCode::PageDown => ActionKind::ToggleButtonKeyDownPageDown,
        KeyCode::Escape => ActionKind::ToggleButtonKeyDownEscape,
        _ => return None,
    };
    Some(Action::new(kind))
}

fn map_menu_key<T>(key: &KeyEvent, state: &MapperState) -> Option<Action<T>> {
    if !pressed(key) {
        return None;
    }
    if let Some(ch) = typed_char(key, state) {
        return Some(Action::with_payload(
            ActionKind::MenuKeyDownCharacter,
            Payload::Character(ch),
        ));
    }

    let kind = match key.code {
        KeyCode::Down => ActionKind::MenuKeyDownArrowDown,
        KeyCode::Up => ActionKind::MenuKeyDownArrowUp,
        KeyCode::Home => ActionKind::MenuKeyDownHome,
        KeyCode::End => ActionKind::MenuKeyDownEnd,
        KeyCode::PageUp => ActionKind::MenuKeyDownPageUp,
        KeyCode::PageDown => ActionKind::MenuKeyDownPageDown,
        KeyCode::Escape => ActionKind::MenuKeyDownEscape,
        KeyCode::Enter => ActionKind::MenuKeyDownEnter,
        KeyCode::Char(' ') => ActionKind::MenuKeyDownSpaceButton,
        KeyCode::Tab | KeyCode::BackTab => ActionKind::MenuKeyDownTab,
        _ => return None,
    };
    Some(Action::new(kind))
}
