#![forbid(unsafe_code)]

//! Action taxonomy.
//!
//! Every state transition is caused by exactly one [`Action`]. The
//! [`ActionKind`] enumeration is closed and public so a caller's state
//! reducer can match on it.

use std::fmt;

/// Element (or API surface) an action originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The toggle control.
    ToggleButton,
    /// The popup list.
    Menu,
    /// A single option.
    Item,
    /// A programmatic action function or the type-ahead timer.
    Function,
}

/// Why a state transition is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ToggleButtonClick,
    ToggleButtonKeyDownArrowDown,
    ToggleButtonKeyDownArrowUp,
    ToggleButtonKeyDownCharacter,
    ToggleButtonKeyDownEscape,
    ToggleButtonKeyDownHome,
    ToggleButtonKeyDownEnd,
    ToggleButtonKeyDownPageUp,
    ToggleButtonKeyDownPageDown,
    ToggleButtonBlur,

    MenuKeyDownArrowDown,
    MenuKeyDownArrowUp,
    MenuKeyDownEscape,
    MenuKeyDownHome,
    MenuKeyDownEnd,
    MenuKeyDownPageUp,
    MenuKeyDownPageDown,
    MenuKeyDownEnter,
    MenuKeyDownSpaceButton,
    MenuKeyDownCharacter,
    MenuKeyDownTab,
    MenuBlur,
    MenuMouseLeave,

    ItemMouseMove,
    ItemClick,

    FunctionOpenMenu,
    FunctionCloseMenu,
    FunctionToggleMenu,
    FunctionSetHighlightedIndex,
    FunctionSelectItem,
    FunctionReset,
    FunctionClearTypeahead,
}

impl ActionKind {
    /// Every action kind, in declaration order.
    pub const ALL: [Self; 32] = [
        Self::ToggleButtonClick,
        Self::ToggleButtonKeyDownArrowDown,
        Self::ToggleButtonKeyDownArrowUp,
        Self::ToggleButtonKeyDownCharacter,
        Self::ToggleButtonKeyDownEscape,
        Self::ToggleButtonKeyDownHome,
        Self::ToggleButtonKeyDownEnd,
        Self::ToggleButtonKeyDownPageUp,
        Self::ToggleButtonKeyDownPageDown,
        Self::ToggleButtonBlur,
        Self::MenuKeyDownArrowDown,
        Self::MenuKeyDownArrowUp,
        Self::MenuKeyDownEscape,
        Self::MenuKeyDownHome,
        Self::MenuKeyDownEnd,
        Self::MenuKeyDownPageUp,
        Self::MenuKeyDownPageDown,
        Self::MenuKeyDownEnter,
        Self::MenuKeyDownSpaceButton,
        Self::MenuKeyDownCharacter,
        Self::MenuKeyDownTab,
        Self::MenuBlur,
        Self::MenuMouseLeave,
        Self::ItemMouseMove,
        Self::ItemClick,
        Self::FunctionOpenMenu,
        Self::FunctionCloseMenu,
        Self::FunctionToggleMenu,
        Self::FunctionSetHighlightedIndex,
        Self::FunctionSelectItem,
        Self::FunctionReset,
        Self::FunctionClearTypeahead,
    ];

    /// The element this kind of action comes from.
    #[must_use]
    pub const fn origin(self) -> Origin {
        match self {
            Self::ToggleButtonClick
            | Self::ToggleButtonKeyDownArrowDown
            | Self::ToggleButtonKeyDownArrowUp
            | Self::ToggleButtonKeyDownCharacter
            | Self::ToggleButtonKeyDownEscape
            | Self::ToggleButtonKeyDownHome
            | Self::ToggleButtonKeyDownEnd
            | Self::ToggleButtonKeyDownPageUp
            | Self::ToggleButtonKeyDownPageDown
            | Self::ToggleButtonBlur => Origin::ToggleButton,
            Self::MenuKeyDownArrowDown
            | Self::MenuKeyDownArrowUp
            | Self::MenuKeyDownEscape
            | Self::MenuKeyDownHome
            | Self::MenuKeyDownEnd
            | Self::MenuKeyDownPageUp
            | Self::MenuKeyDownPageDown
            | Self::MenuKeyDownEnter
            | Self::MenuKeyDownSpaceButton
            | Self::MenuKeyDownCharacter
            | Self::MenuKeyDownTab
            | Self::MenuBlur
            | Self::MenuMouseLeave => Origin::Menu,
            Self::ItemMouseMove | Self::ItemClick => Origin::Item,
            Self::FunctionOpenMenu
            | Self::FunctionCloseMenu
            | Self::FunctionToggleMenu
            | Self::FunctionSetHighlightedIndex
            | Self::FunctionSelectItem
            | Self::FunctionReset
            | Self::FunctionClearTypeahead => Origin::Function,
        }
    }

    /// Whether this is a type-ahead character action.
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(
            self,
            Self::ToggleButtonKeyDownCharacter | Self::MenuKeyDownCharacter
        )
    }

    /// Whether focus left the widget as part of this action.
    ///
    /// Closing the menu for one of these must not pull focus back to the
    /// toggle control.
    #[must_use]
    pub const fn is_focus_loss(self) -> bool {
        matches!(
            self,
            Self::ToggleButtonBlur | Self::MenuBlur | Self::MenuKeyDownTab
        )
    }

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleButtonClick => "toggle_button_click",
            Self::ToggleButtonKeyDownArrowDown => "toggle_button_keydown_arrow_down",
            Self::ToggleButtonKeyDownArrowUp => "toggle_button_keydown_arrow_up",
            Self::ToggleButtonKeyDownCharacter => "toggle_button_keydown_character",
            Self::ToggleButtonKeyDownEscape => "toggle_button_keydown_escape",
            Self::ToggleButtonKeyDownHome => "toggle_button_keydown_home",
            Self::ToggleButtonKeyDownEnd => "toggle_button_keydown_end",
            Self::ToggleButtonKeyDownPageUp => "toggle_button_keydown_page_up",
            Self::ToggleButtonKeyDownPageDown => "toggle_button_keydown_page_down",
            Self::ToggleButtonBlur => "toggle_button_blur",
            Self::MenuKeyDownArrowDown => "menu_keydown_arrow_down",
            Self::MenuKeyDownArrowUp => "menu_keydown_arrow_up",
            Self::MenuKeyDownEscape => "menu_keydown_escape",
            Self::MenuKeyDownHome => "menu_keydown_home",
            Self::MenuKeyDownEnd => "menu_keydown_end",
            Self::MenuKeyDownPageUp => "menu_keydown_page_up",
            Self::MenuKeyDownPageDown => "menu_keydown_page_down",
            Self::MenuKeyDownEnter => "menu_keydown_enter",
            Self::MenuKeyDownSpaceButton => "menu_keydown_space_button",
            Self::MenuKeyDownCharacter => "menu_keydown_character",
            Self::MenuKeyDownTab => "menu_keydown_tab",
            Self::MenuBlur => "menu_blur",
            Self::MenuMouseLeave => "menu_mouse_leave",
            Self::ItemMouseMove => "item_mouse_move",
            Self::ItemClick => "item_click",
            Self::FunctionOpenMenu => "function_open_menu",
            Self::FunctionCloseMenu => "function_close_menu",
            Self::FunctionToggleMenu => "function_toggle_menu",
            Self::FunctionSetHighlightedIndex => "function_set_highlighted_index",
            Self::FunctionSelectItem => "function_select_item",
            Self::FunctionReset => "function_reset",
            Self::FunctionClearTypeahead => "function_clear_typeahead",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event-derived data attached to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<T> {
    /// No data.
    None,
    /// The typed character for type-ahead.
    Character(char),
    /// Index of the item the pointer acted on.
    Index(usize),
    /// Requested highlight for [`ActionKind::FunctionSetHighlightedIndex`].
    Highlight(Option<usize>),
    /// Requested selection for [`ActionKind::FunctionSelectItem`].
    Item(Option<T>),
    /// Alt was held (toggle ArrowUp with Alt commits the highlight).
    Alt,
}

/// A tagged reason for a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action<T> {
    /// The action kind.
    pub kind: ActionKind,
    /// Event-derived data.
    pub payload: Payload<T>,
}

impl<T> Action<T> {
    /// An action with no payload.
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            payload: Payload::None,
        }
    }

    /// An action with a payload.
    #[must_use]
    pub const fn with_payload(kind: ActionKind, payload: Payload<T>) -> Self {
        Self { kind, payload }
    }

    /// The element the action originates from.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.kind.origin()
    }

    /// The typed character, for character actions.
    #[must_use]
    pub fn character(&self) -> Option<char> {
        match self.payload {
            Payload::Character(ch) => Some(ch),
            _ => None,
        }
    }

    /// The item index, for item actions.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.payload {
            Payload::Index(index) => Some(index),
            _ => None,
        }
    }
}
