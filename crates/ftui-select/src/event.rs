#![forbid(unsafe_code)]

//! Raw input events as delivered by the rendering layer.
//!
//! Events are tagged by the element that received them (see [`ElementRole`])
//! and carry an explicit "default prevented" flag. Caller-supplied handlers
//! run before the engine's own handler and may set the flag with
//! [`InputEvent::prevent_default`] to suppress the engine's reaction.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press`; only presses are mapped to actions.
//! - `Modifiers` use bitflags for easy combination.
//! - Pointer events carry no coordinates: the receiving element already
//!   identifies the target item.

use bitflags::bitflags;

/// The widget element an event was delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// The `<label>`-equivalent element.
    Label,
    /// The control that opens and closes the list.
    ToggleButton,
    /// The popup list container.
    Menu,
    /// A list option, by index in the current item sequence.
    Item(usize),
}

impl ElementRole {
    /// Stable lowercase name, used as the `role` field of input logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::ToggleButton => "toggle_button",
            Self::Menu => "menu",
            Self::Item(_) => "item",
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Super/Meta/Cmd modifier is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }

    /// The printable character of this key, if it can take part in
    /// type-ahead (no Ctrl/Alt/Super, not a control character).
    #[must_use]
    pub fn typeahead_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !ch.is_control() && !self.ctrl() && !self.alt() && !self.super_key() =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

/// Key codes the select engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. Space arrives as `Char(' ')`.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

bitflags! {
    /// Set of event kinds an element's handler bundle listens to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u8 {
        /// Key presses.
        const KEY          = 0b0_0001;
        /// Primary-button clicks.
        const CLICK        = 0b0_0010;
        /// Pointer moved over the element.
        const POINTER_MOVE = 0b0_0100;
        /// Pointer left the element.
        const POINTER_LEAVE = 0b0_1000;
        /// Element lost focus.
        const BLUR         = 0b1_0000;
    }
}

/// Payload of an [`InputEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEventKind {
    /// A keyboard event.
    Key(KeyEvent),
    /// Primary-button click (or tap).
    Click,
    /// Pointer moved over the element.
    PointerMove,
    /// Pointer left the element.
    PointerLeave,
    /// Focus left the element.
    Blur {
        /// Id of the element receiving focus, when known.
        related_target: Option<String>,
    },
}

impl InputEventKind {
    /// The mask bit this kind belongs to.
    #[must_use]
    pub const fn mask(&self) -> EventMask {
        match self {
            Self::Key(_) => EventMask::KEY,
            Self::Click => EventMask::CLICK,
            Self::PointerMove => EventMask::POINTER_MOVE,
            Self::PointerLeave => EventMask::POINTER_LEAVE,
            Self::Blur { .. } => EventMask::BLUR,
        }
    }
}

/// A raw input event with a "default prevented" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    kind: InputEventKind,
    default_prevented: bool,
}

impl InputEvent {
    /// Wrap an event payload.
    #[must_use]
    pub const fn new(kind: InputEventKind) -> Self {
        Self {
            kind,
            default_prevented: false,
        }
    }

    /// A key press.
    #[must_use]
    pub const fn key(event: KeyEvent) -> Self {
        Self::new(InputEventKind::Key(event))
    }

    /// A key press with no modifiers.
    #[must_use]
    pub const fn key_code(code: KeyCode) -> Self {
        Self::key(KeyEvent::new(code))
    }

    /// A click.
    #[must_use]
    pub const fn click() -> Self {
        Self::new(InputEventKind::Click)
    }

    /// Pointer moved over the element.
    #[must_use]
    pub const fn pointer_move() -> Self {
        Self::new(InputEventKind::PointerMove)
    }

    /// Pointer left the element.
    #[must_use]
    pub const fn pointer_leave() -> Self {
        Self::new(InputEventKind::PointerLeave)
    }

    /// Focus left the element, moving to `related_target` if known.
    #[must_use]
    pub fn blur(related_target: Option<impl Into<String>>) -> Self {
        Self::new(InputEventKind::Blur {
            related_target: related_target.map(Into::into),
        })
    }

    /// The event payload.
    #[must_use]
    pub const fn kind(&self) -> &InputEventKind {
        &self.kind
    }

    /// Suppress the engine's handler for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the engine's reaction.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_ignore_item_index() {
        assert_eq!(ElementRole::ToggleButton.as_str(), "toggle_button");
        assert_eq!(ElementRole::Item(0).as_str(), ElementRole::Item(9).as_str());
    }

    #[test]
    fn key_event_modifiers() {
        let event = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(event.ctrl());
        assert!(!event.alt());
        assert!(!event.super_key());
    }

    #[test]
    fn typeahead_char_ignores_chords() {
        assert_eq!(KeyEvent::new(KeyCode::Char('a')).typeahead_char(), Some('a'));
        assert_eq!(
            KeyEvent::new(KeyCode::Char('A'))
                .with_modifiers(Modifiers::SHIFT)
                .typeahead_char(),
            Some('A')
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Char('a'))
                .with_modifiers(Modifiers::CTRL)
                .typeahead_char(),
            None
        );
        assert_eq!(KeyEvent::new(KeyCode::Char('\u{7}')).typeahead_char(), None);
        assert_eq!(KeyEvent::new(KeyCode::Enter).typeahead_char(), None);
    }

    #[test]
    fn prevent_default_sets_flag() {
        let mut event = InputEvent::click();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn kind_mask_matches_payload() {
        assert_eq!(InputEvent::click().kind().mask(), EventMask::CLICK);
        assert_eq!(
            InputEvent::blur(None::<String>).kind().mask(),
            EventMask::BLUR
        );
        assert_eq!(
            InputEvent::key_code(KeyCode::Down).kind().mask(),
            EventMask::KEY
        );
    }
}
