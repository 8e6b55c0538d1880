#![forbid(unsafe_code)]

//! Property bundles for the four widget elements.
//!
//! Each generator is a pure function of the current state and the instance's
//! [`SelectIds`]. A bundle carries the element id, its ARIA attributes, and a
//! [`Handlers`] value the renderer calls when the element receives input.
//!
//! # Handler Chaining
//!
//! A bundle may carry a caller-supplied extra handler. On dispatch the extra
//! handler runs first; if it called [`InputEvent::prevent_default`] the
//! engine's own handler is skipped:
//!
//! ```
//! use ftui_select::config::SelectConfig;
//! use ftui_select::event::InputEvent;
//! use ftui_select::select::Select;
//!
//! let mut select = Select::new(SelectConfig::new(vec!["a", "b"]));
//! let mut toggle = select.toggle_button_props(Some(Box::new(|event: &mut InputEvent| {
//!     event.prevent_default();
//! })));
//! assert!(!toggle.dispatch(&mut select, InputEvent::click()));
//! assert!(!select.is_open());
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::config::{IdConfig, ItemIdFn};
use crate::environment::Environment;
use crate::event::{ElementRole, EventMask, InputEvent, InputEventKind};
use crate::select::Select;
use crate::state::SelectionState;

/// Prefix handed to [`Environment::unique_id`] when no base id is configured.
pub const DEFAULT_ID_PREFIX: &str = "ftui-select";

/// A rendered attribute: `(name, value)`.
pub type Attribute = (&'static str, String);

/// Caller-supplied handler that runs before the engine's own.
pub type EventHandler = Box<dyn FnMut(&mut InputEvent)>;

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Stable element ids for one select instance.
pub struct SelectIds {
    /// Base id.
    pub id: String,
    /// Label element id.
    pub label_id: String,
    /// Menu element id.
    pub menu_id: String,
    /// Toggle control element id.
    pub toggle_button_id: String,
    item_id: Option<ItemIdFn>,
}

impl SelectIds {
    /// Resolve the configured ids, deriving missing ones from the base id.
    ///
    /// Without a configured base id, `environment` supplies one from
    /// [`DEFAULT_ID_PREFIX`].
    #[must_use]
    pub fn resolve(config: IdConfig, environment: &mut dyn Environment) -> Self {
        let id = config
            .id
            .unwrap_or_else(|| environment.unique_id(DEFAULT_ID_PREFIX));
        Self {
            label_id: config.label_id.unwrap_or_else(|| format!("{id}-label")),
            menu_id: config.menu_id.unwrap_or_else(|| format!("{id}-menu")),
            toggle_button_id: config
                .toggle_button_id
                .unwrap_or_else(|| format!("{id}-toggle-button")),
            item_id: config.item_id,
            id,
        }
    }

    /// Element id of the item at `index`.
    #[must_use]
    pub fn item_id(&self, index: usize) -> String {
        match &self.item_id {
            Some(item_id) => item_id(index),
            None => format!("{}-item-{index}", self.id),
        }
    }
}

impl fmt::Debug for SelectIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectIds")
            .field("id", &self.id)
            .field("label_id", &self.label_id)
            .field("menu_id", &self.menu_id)
            .field("toggle_button_id", &self.toggle_button_id)
            .field("custom_item_id", &self.item_id.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Two-stage event handler attached to one element.
pub struct Handlers {
    role: ElementRole,
    listens: EventMask,
    extra: Option<EventHandler>,
}

impl Handlers {
    fn new(role: ElementRole, listens: EventMask, extra: Option<EventHandler>) -> Self {
        Self {
            role,
            listens,
            extra,
        }
    }

    /// Element these handlers belong to.
    #[must_use]
    pub const fn role(&self) -> ElementRole {
        self.role
    }

    /// Event kinds the engine reacts to on this element.
    #[must_use]
    pub const fn listens(&self) -> EventMask {
        self.listens
    }

    /// Whether the engine reacts to `event` on this element.
    #[must_use]
    pub fn handles(&self, event: &InputEventKind) -> bool {
        self.listens.contains(event.mask())
    }

    /// Run the extra handler, then the engine's unless prevented.
    ///
    /// Returns `true` if the engine dispatched an action.
    pub fn dispatch<T, E>(&mut self, select: &mut Select<T, E>, mut event: InputEvent) -> bool
    where
        T: Clone + 'static,
        E: Environment,
    {
        if let Some(extra) = self.extra.as_mut() {
            extra(&mut event);
        }
        if event.default_prevented() || !self.handles(event.kind()) {
            return false;
        }
        select.handle_input(self.role, &event)
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("role", &self.role)
            .field("listens", &self.listens)
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Ref slot
// ---------------------------------------------------------------------------

/// Handle the renderer binds to the real scrollable menu container.
#[derive(Debug, Clone)]
pub struct RefSlot {
    menu_id: String,
    bound: Rc<Cell<bool>>,
}

impl RefSlot {
    pub(crate) fn new(menu_id: String, bound: Rc<Cell<bool>>) -> Self {
        Self { menu_id, bound }
    }

    /// Id of the element this slot must be bound to.
    #[must_use]
    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    /// Record that the slot was forwarded to the scrollable container.
    pub fn bind(&self) {
        self.bound.set(true);
    }

    /// Whether the slot was bound since the last render began.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }
}

// ---------------------------------------------------------------------------
// Bundles
// ---------------------------------------------------------------------------

/// Label element bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelProps {
    /// Element id, referenced by the toggle and the menu.
    pub id: String,
    /// Id of the toggle control this label is for.
    pub html_for: String,
}

impl LabelProps {
    /// Rendered attributes.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        vec![("id", self.id.clone()), ("for", self.html_for.clone())]
    }
}

/// Toggle control bundle.
#[derive(Debug)]
pub struct ToggleButtonProps {
    /// Element id.
    pub id: String,
    /// Always `combobox`.
    pub role: &'static str,
    /// Id of the highlighted option while the menu is open.
    pub aria_activedescendant: Option<String>,
    /// Id of the menu this control opens.
    pub aria_controls: String,
    /// Whether the menu is open.
    pub aria_expanded: bool,
    /// Always `listbox`.
    pub aria_haspopup: &'static str,
    /// Id of the label element.
    pub aria_labelledby: String,
    /// Focusable in tab order.
    pub tab_index: i32,
    /// Display string of the current selection, rendered as `value`.
    pub value_text: String,
    handlers: Handlers,
}

impl ToggleButtonProps {
    /// Rendered attributes.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![
            ("id", self.id.clone()),
            ("role", self.role.to_string()),
            ("aria-controls", self.aria_controls.clone()),
            ("aria-expanded", self.aria_expanded.to_string()),
            ("aria-haspopup", self.aria_haspopup.to_string()),
            ("aria-labelledby", self.aria_labelledby.clone()),
            ("tabindex", self.tab_index.to_string()),
        ];
        if let Some(active) = &self.aria_activedescendant {
            attrs.push(("aria-activedescendant", active.clone()));
        }
        if !self.value_text.is_empty() {
            attrs.push(("value", self.value_text.clone()));
        }
        attrs
    }

    /// The element's handlers.
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Deliver `event` to this element.
    pub fn dispatch<T, E>(&mut self, select: &mut Select<T, E>, event: InputEvent) -> bool
    where
        T: Clone + 'static,
        E: Environment,
    {
        self.handlers.dispatch(select, event)
    }
}

/// Menu (listbox) bundle.
#[derive(Debug)]
pub struct MenuProps {
    /// Element id, referenced by the toggle's `aria-controls`.
    pub id: String,
    /// Always `listbox`.
    pub role: &'static str,
    /// Id of the label element.
    pub aria_labelledby: String,
    /// Id of the highlighted option while open.
    pub aria_activedescendant: Option<String>,
    /// Focusable by script only.
    pub tab_index: i32,
    /// Must be bound to the real scrollable container.
    pub ref_slot: RefSlot,
    handlers: Handlers,
}

impl MenuProps {
    /// Rendered attributes.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![
            ("id", self.id.clone()),
            ("role", self.role.to_string()),
            ("aria-labelledby", self.aria_labelledby.clone()),
            ("tabindex", self.tab_index.to_string()),
        ];
        if let Some(active) = &self.aria_activedescendant {
            attrs.push(("aria-activedescendant", active.clone()));
        }
        attrs
    }

    /// The element's handlers.
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Deliver `event` to this element.
    pub fn dispatch<T, E>(&mut self, select: &mut Select<T, E>, event: InputEvent) -> bool
    where
        T: Clone + 'static,
        E: Environment,
    {
        self.handlers.dispatch(select, event)
    }
}

/// Option bundle.
#[derive(Debug)]
pub struct ItemProps {
    /// Element id from the item id generator.
    pub id: String,
    /// Position in the item sequence.
    pub index: usize,
    /// Always `option`.
    pub role: &'static str,
    /// Whether this option is the committed selection.
    pub aria_selected: bool,
    /// Whether this option is disabled.
    pub aria_disabled: bool,
    /// Whether this option is the highlighted one.
    pub is_highlighted: bool,
    handlers: Handlers,
}

impl ItemProps {
    /// Rendered attributes.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![
            ("id", self.id.clone()),
            ("role", self.role.to_string()),
            ("aria-selected", self.aria_selected.to_string()),
        ];
        if self.aria_disabled {
            attrs.push(("aria-disabled", "true".to_string()));
        }
        attrs
    }

    /// Whether the bundle reacts to any input.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.handlers.listens.is_empty()
    }

    /// The element's handlers.
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Deliver `event` to this element.
    pub fn dispatch<T, E>(&mut self, select: &mut Select<T, E>, event: InputEvent) -> bool
    where
        T: Clone + 'static,
        E: Environment,
    {
        self.handlers.dispatch(select, event)
    }
}

/// How one option relates to the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemStatus {
    /// The index exists in the current item sequence.
    pub in_range: bool,
    /// The item is the committed selection.
    pub selected: bool,
    /// The item is disabled.
    pub disabled: bool,
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn active_descendant<T>(ids: &SelectIds, state: &SelectionState<T>) -> Option<String> {
    if !state.is_open {
        return None;
    }
    state.highlighted_index.map(|index| ids.item_id(index))
}

/// Label bundle.
#[must_use]
pub fn label_props(ids: &SelectIds) -> LabelProps {
    LabelProps {
        id: ids.label_id.clone(),
        html_for: ids.toggle_button_id.clone(),
    }
}

/// Toggle control bundle for `state`.
#[must_use]
pub fn toggle_button_props<T>(
    ids: &SelectIds,
    state: &SelectionState<T>,
    value_text: String,
    extra: Option<EventHandler>,
) -> ToggleButtonProps {
    ToggleButtonProps {
        id: ids.toggle_button_id.clone(),
        role: "combobox",
        aria_activedescendant: active_descendant(ids, state),
        aria_controls: ids.menu_id.clone(),
        aria_expanded: state.is_open,
        aria_haspopup: "listbox",
        aria_labelledby: ids.label_id.clone(),
        tab_index: 0,
        value_text,
        handlers: Handlers::new(
            ElementRole::ToggleButton,
            EventMask::KEY | EventMask::CLICK | EventMask::BLUR,
            extra,
        ),
    }
}

/// Menu bundle for `state`.
#[must_use]
pub fn menu_props<T>(
    ids: &SelectIds,
    state: &SelectionState<T>,
    ref_slot: RefSlot,
    extra: Option<EventHandler>,
) -> MenuProps {
    MenuProps {
        id: ids.menu_id.clone(),
        role: "listbox",
        aria_labelledby: ids.label_id.clone(),
        aria_activedescendant: active_descendant(ids, state),
        tab_index: -1,
        ref_slot,
        handlers: Handlers::new(
            ElementRole::Menu,
            EventMask::KEY | EventMask::BLUR | EventMask::POINTER_LEAVE,
            extra,
        ),
    }
}

/// Option bundle for the item at `index`.
///
/// Out-of-range and disabled items get an inert bundle.
#[must_use]
pub fn item_props<T>(
    ids: &SelectIds,
    state: &SelectionState<T>,
    index: usize,
    status: ItemStatus,
    extra: Option<EventHandler>,
) -> ItemProps {
    let listens = if status.in_range && !status.disabled {
        EventMask::CLICK | EventMask::POINTER_MOVE
    } else {
        EventMask::empty()
    };
    ItemProps {
        id: ids.item_id(index),
        index,
        role: "option",
        aria_selected: status.in_range && status.selected,
        aria_disabled: status.disabled,
        is_highlighted: status.in_range && state.highlighted_index == Some(index),
        handlers: Handlers::new(ElementRole::Item(index), listens, extra),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{DetachedEnvironment, RecordingEnvironment};

    fn ids() -> SelectIds {
        let config = IdConfig {
            id: Some("fruit".to_string()),
            ..IdConfig::default()
        };
        SelectIds::resolve(config, &mut DetachedEnvironment)
    }

    fn open_at(index: usize) -> SelectionState<u8> {
        SelectionState {
            is_open: true,
            highlighted_index: Some(index),
            ..SelectionState::default()
        }
    }

    #[test]
    fn ids_derive_from_base() {
        let ids = ids();
        assert_eq!(ids.label_id, "fruit-label");
        assert_eq!(ids.menu_id, "fruit-menu");
        assert_eq!(ids.toggle_button_id, "fruit-toggle-button");
        assert_eq!(ids.item_id(4), "fruit-item-4");
    }

    #[test]
    fn synthesized_ids_come_from_environment() {
        let mut env = RecordingEnvironment::new();
        let a = SelectIds::resolve(IdConfig::default(), &mut env);
        let b = SelectIds::resolve(IdConfig::default(), &mut env);
        assert_eq!(a.id, "ftui-select-0");
        assert_eq!(b.toggle_button_id, "ftui-select-1-toggle-button");

        let detached = SelectIds::resolve(IdConfig::default(), &mut DetachedEnvironment);
        assert_eq!(detached.menu_id, "ftui-select-menu");
    }

    #[test]
    fn explicit_ids_win() {
        let config = IdConfig {
            id: Some("base".to_string()),
            menu_id: Some("my-menu".to_string()),
            item_id: Some(Box::new(|index| format!("opt{index}"))),
            ..IdConfig::default()
        };
        let mut env = RecordingEnvironment::new();
        let ids = SelectIds::resolve(config, &mut env);
        assert_eq!(ids.menu_id, "my-menu");
        assert_eq!(env.unique_id("x"), "x-0", "explicit base id consumes nothing");
        assert_eq!(ids.label_id, "base-label");
        assert_eq!(ids.item_id(2), "opt2");
    }

    #[test]
    fn toggle_reflects_state() {
        let ids = ids();
        let closed = toggle_button_props(&ids, &SelectionState::<u8>::default(), String::new(), None);
        assert!(!closed.aria_expanded);
        assert_eq!(closed.aria_activedescendant, None);
        assert_eq!(closed.aria_controls, "fruit-menu");

        let open = toggle_button_props(&ids, &open_at(1), "Apple".to_string(), None);
        assert!(open.aria_expanded);
        assert_eq!(open.aria_activedescendant.as_deref(), Some("fruit-item-1"));
        assert!(open.attributes().contains(&("aria-expanded", "true".to_string())));
        assert_eq!(open.value_text, "Apple");
    }

    #[test]
    fn menu_exposes_listbox_semantics() {
        let ids = ids();
        let slot = RefSlot::new(ids.menu_id.clone(), Rc::new(Cell::new(false)));
        let menu = menu_props(&ids, &open_at(2), slot, None);
        assert_eq!(menu.role, "listbox");
        assert_eq!(menu.aria_labelledby, "fruit-label");
        assert_eq!(menu.aria_activedescendant.as_deref(), Some("fruit-item-2"));
        assert!(!menu.ref_slot.is_bound());
        menu.ref_slot.bind();
        assert!(menu.ref_slot.is_bound());
    }

    #[test]
    fn out_of_range_item_is_inert() {
        let ids = ids();
        let item = item_props(&ids, &open_at(9), 9, ItemStatus::default(), None);
        assert!(item.is_inert());
        assert!(!item.aria_selected);
        assert!(!item.is_highlighted);
        assert_eq!(item.id, "fruit-item-9");
    }

    #[test]
    fn disabled_item_reports_aria_disabled() {
        let ids = ids();
        let status = ItemStatus {
            in_range: true,
            selected: false,
            disabled: true,
        };
        let item = item_props(&ids, &open_at(0), 1, status, None);
        assert!(item.is_inert());
        assert!(item.attributes().contains(&("aria-disabled", "true".to_string())));
    }

    #[test]
    fn label_points_at_toggle() {
        let label = label_props(&ids());
        assert_eq!(label.html_for, "fruit-toggle-button");
        assert_eq!(label.attributes()[0], ("id", "fruit-label".to_string()));
    }
}
