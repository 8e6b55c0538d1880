#![forbid(unsafe_code)]

//! The per-instance select engine.
//!
//! A [`Select`] owns everything one widget instance needs: the item
//! sequence, the merged [`SelectionState`], the type-ahead timer, the
//! announcer, pending side effects, and the injected [`Environment`].
//!
//! # Pipeline
//!
//! ```text
//! InputEvent ─▶ map_event ─▶ Action ─▶ default_transition ─▶ StateReducer
//!                                                               │
//!     change handlers ◀── commit (controlled merge) ◀── clamp ◀─┘
//!            │
//!            └─▶ timer, announcer, PendingEffects ─▶ flush_effects()
//! ```
//!
//! # Render Cycle
//!
//! ```text
//! begin_render()
//!   label_props() / toggle_button_props() / menu_props() / item_props()
//!   menu.ref_slot.bind()
//! verify_prop_getters()?
//! flush_effects()
//! ```
//!
//! # Example
//!
//! ```
//! use ftui_select::config::SelectConfig;
//! use ftui_select::event::{ElementRole, InputEvent, KeyCode};
//! use ftui_select::select::Select;
//!
//! let mut select = Select::new(SelectConfig::new(vec!["Banana", "Apple", "Avocado"]));
//! select.handle_input(ElementRole::ToggleButton, &InputEvent::key_code(KeyCode::Down));
//! assert!(select.is_open());
//! assert_eq!(select.highlighted_index(), Some(0));
//!
//! select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Char('a')));
//! assert_eq!(select.highlighted_index(), Some(1));
//!
//! select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Enter));
//! assert_eq!(select.selected_item(), Some(&"Apple"));
//! assert!(!select.is_open());
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use web_time::Instant;

use crate::action::{Action, ActionKind, Payload};
use crate::announcer::{Announcer, StatusContext, StatusMessageFn};
use crate::config::{Callbacks, ItemFns, SelectConfig, Seeds};
use crate::effects::{PendingEffects, ScrollIntoViewFn};
use crate::environment::{DetachedEnvironment, Environment};
use crate::error::{Result, SelectError};
use crate::event::{ElementRole, InputEvent, InputEventKind};
use crate::mapper::{MapperState, map_event};
use crate::props::{
    self, EventHandler, ItemProps, ItemStatus, LabelProps, MenuProps, RefSlot, SelectIds,
    ToggleButtonProps,
};
use crate::reducer::{ReducerContext, StateReducer, default_transition};
use crate::state::{ControlledProps, SelectionState, StateChangeEvent, StateChanges, same_item};
use crate::typeahead::TypeaheadTimer;

/// Which prop getters ran since [`Select::begin_render`].
#[derive(Debug, Clone, Copy, Default)]
struct RenderCheck {
    active: bool,
    toggle_button: bool,
    menu: bool,
}

/// One select widget instance.
pub struct Select<T, E: Environment = DetachedEnvironment> {
    items: Vec<T>,
    item_fns: ItemFns<T>,
    seeds: Seeds<T>,
    controlled: ControlledProps<T>,
    state: SelectionState<T>,
    ids: SelectIds,
    reducer: Option<Box<dyn StateReducer<T>>>,
    callbacks: Callbacks<T>,
    scroll_into_view: Option<ScrollIntoViewFn>,
    status_message: StatusMessageFn<T>,
    circular: bool,
    timer: TypeaheadTimer,
    announcer: Announcer,
    effects: PendingEffects,
    render: RenderCheck,
    menu_bound: Rc<Cell<bool>>,
    environment: E,
    torn_down: bool,
}

impl<T: Clone + 'static> Select<T> {
    /// Create an instance with no document attached.
    #[must_use]
    pub fn new(config: SelectConfig<T>) -> Self {
        Self::with_environment(config, DetachedEnvironment)
    }
}

impl<T: Clone + 'static, E: Environment> Select<T, E> {
    /// Create an instance that performs side effects through `environment`.
    #[must_use]
    pub fn with_environment(config: SelectConfig<T>, mut environment: E) -> Self {
        let SelectConfig {
            items,
            item_fns,
            seeds,
            controlled,
            ids,
            state_reducer,
            callbacks,
            scroll_into_view,
            status_message,
            circular_navigation,
            timing,
        } = config;
        let timing = timing.validated();
        let ids = SelectIds::resolve(ids, &mut environment);

        let mut select = Self {
            items,
            item_fns,
            seeds,
            controlled,
            state: SelectionState::default(),
            ids,
            reducer: state_reducer,
            callbacks,
            scroll_into_view,
            status_message,
            circular: circular_navigation,
            timer: TypeaheadTimer::new(timing.typeahead_timeout),
            announcer: Announcer::new(timing.status_clear_delay),
            effects: PendingEffects::default(),
            render: RenderCheck::default(),
            menu_bound: Rc::new(Cell::new(false)),
            environment,
            torn_down: false,
        };
        select.state = select.initial_state();
        select
    }

    fn initial_state(&self) -> SelectionState<T> {
        let seeds = &self.seeds;
        let context = self.reducer_context();
        let mut state = SelectionState {
            is_open: seeds.initial_is_open.unwrap_or(seeds.default_is_open),
            highlighted_index: context.clamp(
                seeds
                    .initial_highlighted_index
                    .or(seeds.default_highlighted_index),
            ),
            selected_item: match &seeds.initial_selected_item {
                Some(item) => item.clone(),
                None => seeds.default_selected_item.clone(),
            },
            typeahead: String::new(),
        };
        state = self.settle(state);
        if state.is_open && state.highlighted_index.is_none() {
            state.highlighted_index = context.highlight_on_open(&state, false);
            state = self.settle(state);
        }
        state
    }

    /// Overlay controlled values, then clamp the highlight to the items.
    fn settle(&self, state: SelectionState<T>) -> SelectionState<T> {
        let mut state = self.controlled.merge(state);
        state.highlighted_index = self.reducer_context().clamp(state.highlighted_index);
        state
    }

    fn reducer_context(&self) -> ReducerContext<'_, T> {
        ReducerContext {
            items: &self.items,
            fns: &self.item_fns,
            circular: self.circular,
            initial_highlighted_index: self.seeds.initial_highlighted_index,
            default_highlighted_index: self.seeds.default_highlighted_index,
            default_is_open: self.seeds.default_is_open,
            default_selected_item: &self.seeds.default_selected_item,
        }
    }

    // -----------------------------------------------------------------------
    // State accessors
    // -----------------------------------------------------------------------

    /// The committed state, with controlled values overlaid.
    #[must_use]
    pub fn state(&self) -> &SelectionState<T> {
        &self.state
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// The highlighted index.
    #[must_use]
    pub fn highlighted_index(&self) -> Option<usize> {
        self.state.highlighted_index
    }

    /// The committed selection.
    #[must_use]
    pub fn selected_item(&self) -> Option<&T> {
        self.state.selected_item.as_ref()
    }

    /// The active type-ahead buffer.
    #[must_use]
    pub fn typeahead(&self) -> &str {
        &self.state.typeahead
    }

    /// The current item sequence.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the item sequence. Controlled values are re-applied and the
    /// highlight is clamped to the new length.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = self.settle(self.state.clone());
    }

    /// Display string of `item`.
    #[must_use]
    pub fn item_label(&self, item: &T) -> String {
        self.item_fns.label(item)
    }

    /// Externally controlled values.
    #[must_use]
    pub fn controlled(&self) -> &ControlledProps<T> {
        &self.controlled
    }

    /// Update controlled values between events.
    ///
    /// A controlled value that changes the committed state is treated like
    /// the matching programmatic action: it is announced and plans effects,
    /// but no change handler fires.
    pub fn update_controlled(&mut self, update: impl FnOnce(&mut ControlledProps<T>)) {
        self.update_controlled_at(update, Instant::now());
    }

    /// [`update_controlled`](Self::update_controlled) at an explicit time.
    pub fn update_controlled_at(
        &mut self,
        update: impl FnOnce(&mut ControlledProps<T>),
        now: Instant,
    ) {
        update(&mut self.controlled);
        let next = self.settle(self.state.clone());

        let kind = match (self.state.is_open, next.is_open) {
            (false, true) => ActionKind::FunctionOpenMenu,
            (true, false) => ActionKind::FunctionCloseMenu,
            _ => ActionKind::FunctionSetHighlightedIndex,
        };
        self.commit(next, kind, now);
    }

    /// Stable element ids.
    #[must_use]
    pub fn ids(&self) -> &SelectIds {
        &self.ids
    }

    /// The message currently in the live region.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.announcer.message()
    }

    /// Earliest pending deadline; call [`tick`](Self::tick) once it passes.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timer.deadline(), self.announcer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Effects waiting for [`flush_effects`](Self::flush_effects).
    #[must_use]
    pub fn pending_effects(&self) -> PendingEffects {
        self.effects
    }

    /// The injected environment.
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// The injected environment, mutably.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    /// Whether [`teardown`](Self::teardown) ran.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Run one transition for `action`.
    pub fn dispatch(&mut self, action: Action<T>) {
        self.dispatch_at(action, Instant::now());
    }

    /// Run one transition for `action` at `now`.
    ///
    /// Exactly one commit happens per call, whatever the number of fields
    /// that change.
    pub fn dispatch_at(&mut self, action: Action<T>, now: Instant) {
        if self.torn_down {
            return;
        }

        let proposal = default_transition(&self.reducer_context(), &self.state, &action);
        let changes = match self.reducer.as_mut() {
            Some(reducer) => reducer
                .reduce(&self.state, &action, proposal.clone())
                .or(proposal),
            None => proposal,
        };

        let mut proposed = changes.apply_to(&self.state);
        proposed.highlighted_index = self.reducer_context().clamp(proposed.highlighted_index);
        let item_fns = &self.item_fns;
        let diff = StateChanges::diff(&self.state, &proposed, |a, b| item_fns.same(a, b));
        let next = self.settle(proposed.clone());

        if next.typeahead.is_empty() {
            self.timer.cancel();
        } else if action.kind.is_character() {
            self.timer.restart(now);
        }

        #[cfg(feature = "tracing")]
        log_transition(action.kind, &next);

        self.commit(next, action.kind, now);

        if !diff.is_empty() {
            self.notify(&StateChangeEvent {
                action,
                changes: diff,
                state: proposed,
            });
        }
    }

    /// Map a raw event delivered to `role` and dispatch it.
    ///
    /// Returns `true` if the event produced an action. Events whose default
    /// was prevented are ignored.
    pub fn handle_input(&mut self, role: ElementRole, event: &InputEvent) -> bool {
        self.handle_input_at(role, event, Instant::now())
    }

    /// [`handle_input`](Self::handle_input) at an explicit time.
    pub fn handle_input_at(&mut self, role: ElementRole, event: &InputEvent, now: Instant) -> bool {
        if self.torn_down || event.default_prevented() {
            return false;
        }
        let blur_within_widget = match event.kind() {
            InputEventKind::Blur {
                related_target: Some(target),
            } => self.is_within_widget(target),
            _ => false,
        };
        let mapper_state = MapperState {
            is_open: self.state.is_open,
            typeahead_active: !self.state.typeahead.is_empty(),
            highlighted_index: self.state.highlighted_index,
            blur_within_widget,
        };
        match map_event(role, event.kind(), &mapper_state) {
            Some(action) => {
                self.dispatch_at(action, now);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(message = "select.input", role = role.as_str(), ignored = true);
                false
            }
        }
    }

    fn is_within_widget(&self, element_id: &str) -> bool {
        self.environment
            .contains(&self.ids.toggle_button_id, element_id)
            || self.environment.contains(&self.ids.menu_id, element_id)
    }

    // -----------------------------------------------------------------------
    // Programmatic actions
    // -----------------------------------------------------------------------

    /// Open the menu.
    pub fn open_menu(&mut self) {
        self.dispatch(Action::new(ActionKind::FunctionOpenMenu));
    }

    /// Close the menu.
    pub fn close_menu(&mut self) {
        self.dispatch(Action::new(ActionKind::FunctionCloseMenu));
    }

    /// Open a closed menu or close an open one.
    pub fn toggle_menu(&mut self) {
        self.dispatch(Action::new(ActionKind::FunctionToggleMenu));
    }

    /// Highlight `index` (clamped), or clear the highlight.
    pub fn set_highlighted_index(&mut self, index: Option<usize>) {
        self.dispatch(Action::with_payload(
            ActionKind::FunctionSetHighlightedIndex,
            Payload::Highlight(index),
        ));
    }

    /// Select `item`, or clear the selection.
    pub fn select_item(&mut self, item: Option<T>) {
        self.dispatch(Action::with_payload(
            ActionKind::FunctionSelectItem,
            Payload::Item(item),
        ));
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        self.dispatch(Action::new(ActionKind::FunctionReset));
    }

    // -----------------------------------------------------------------------
    // Time and effects
    // -----------------------------------------------------------------------

    /// Advance deadlines to `now`: expire the type-ahead buffer and clear a
    /// stale status message.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        if self.timer.poll(now) {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "select.typeahead", expired = true);
            self.dispatch_at(Action::new(ActionKind::FunctionClearTypeahead), now);
        }
        if self.announcer.poll(now) {
            self.environment.announce("");
        }
    }

    /// Perform pending scroll and focus effects.
    ///
    /// Call after the renderer produced output for the current state.
    pub fn flush_effects(&mut self) {
        let effects = self.effects.take();
        if effects.is_empty() || self.torn_down {
            return;
        }
        effects.apply(
            &self.ids,
            self.menu_bound.get(),
            &mut self.environment,
            self.scroll_into_view.as_mut(),
        );
    }

    // -----------------------------------------------------------------------
    // Prop generators
    // -----------------------------------------------------------------------

    /// Start a render pass; prop getter calls are tracked until the next one.
    pub fn begin_render(&mut self) {
        self.render = RenderCheck {
            active: true,
            ..RenderCheck::default()
        };
        self.menu_bound.set(false);
    }

    /// Check that the toggle and menu bundles were generated during this
    /// render pass and that the menu ref slot was bound.
    ///
    /// Passes trivially when no render pass was started.
    pub fn verify_prop_getters(&self) -> Result<()> {
        if !self.render.active {
            return Ok(());
        }
        let result = if !self.render.toggle_button {
            Err(SelectError::PropGetterNotCalled {
                getter: "toggle_button_props",
            })
        } else if !self.render.menu {
            Err(SelectError::PropGetterNotCalled {
                getter: "menu_props",
            })
        } else if !self.menu_bound.get() {
            Err(SelectError::MenuRefNotBound {
                menu_id: self.ids.menu_id.clone(),
            })
        } else {
            Ok(())
        };

        #[cfg(feature = "tracing")]
        if let Err(error) = &result {
            tracing::warn!(message = "select.render", error = %error);
        }

        result
    }

    /// Label bundle.
    #[must_use]
    pub fn label_props(&self) -> LabelProps {
        props::label_props(&self.ids)
    }

    /// Toggle control bundle. `extra` runs before the engine's handler.
    pub fn toggle_button_props(&mut self, extra: Option<EventHandler>) -> ToggleButtonProps {
        self.render.toggle_button = true;
        let value_text = self
            .state
            .selected_item
            .as_ref()
            .map(|item| self.item_fns.label(item))
            .unwrap_or_default();
        props::toggle_button_props(&self.ids, &self.state, value_text, extra)
    }

    /// Menu bundle. Its [`RefSlot`] must be bound to the scroll container.
    pub fn menu_props(&mut self, extra: Option<EventHandler>) -> MenuProps {
        self.render.menu = true;
        let ref_slot = RefSlot::new(self.ids.menu_id.clone(), Rc::clone(&self.menu_bound));
        props::menu_props(&self.ids, &self.state, ref_slot, extra)
    }

    /// Option bundle for `item` at `index`.
    ///
    /// An index outside the current sequence yields an inert bundle.
    #[must_use]
    pub fn item_props(&self, item: &T, index: usize, extra: Option<EventHandler>) -> ItemProps {
        let in_range = index < self.items.len();
        let status = ItemStatus {
            in_range,
            selected: self
                .state
                .selected_item
                .as_ref()
                .is_some_and(|selected| self.item_fns.same(selected, item)),
            disabled: in_range && self.item_fns.disabled(item, index),
        };
        props::item_props(&self.ids, &self.state, index, status, extra)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn commit(&mut self, next: SelectionState<T>, kind: ActionKind, now: Instant) {
        let prev = std::mem::replace(&mut self.state, next);
        let item_fns = &self.item_fns;
        let selection_changed = !same_item(&prev.selected_item, &self.state.selected_item, |a, b| {
            item_fns.same(a, b)
        });
        if selection_changed {
            self.announce_selection(now);
        }
        self.effects.plan(&prev, &self.state, kind);
    }

    fn announce_selection(&mut self, now: Instant) {
        let Some(item) = self.state.selected_item.as_ref() else {
            return;
        };
        let label = self.item_fns.label(item);
        let context = StatusContext {
            selected_item: Some(item),
            selected_label: &label,
            is_open: self.state.is_open,
            highlighted_index: self.state.highlighted_index,
            item_count: self.items.len(),
        };
        let Some(message) = (self.status_message)(&context) else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "select.announce", status = %message);

        self.environment.announce(&message);
        self.announcer.announce(message, now);
    }

    fn notify(&mut self, event: &StateChangeEvent<T>) {
        let callbacks = &mut self.callbacks;
        if event.changes.selected_item.is_some()
            && let Some(handler) = callbacks.on_selected_item_change.as_mut()
        {
            handler(event);
        }
        if event.changes.highlighted_index.is_some()
            && let Some(handler) = callbacks.on_highlighted_index_change.as_mut()
        {
            handler(event);
        }
        if event.changes.is_open.is_some()
            && let Some(handler) = callbacks.on_is_open_change.as_mut()
        {
            handler(event);
        }
        if let Some(handler) = callbacks.on_state_change.as_mut() {
            handler(event);
        }
    }
}

impl<T, E: Environment> Select<T, E> {
    /// Cancel the type-ahead timer, drop pending effects, and clear the live
    /// region. Later input is ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timer.cancel();
        self.effects = PendingEffects::default();
        if self.announcer.message().is_some() {
            self.announcer.clear();
            self.environment.announce("");
        }
    }
}

impl<T, E: Environment> Drop for Select<T, E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T: fmt::Debug, E: Environment + fmt::Debug> fmt::Debug for Select<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("items", &self.items)
            .field("state", &self.state)
            .field("controlled", &self.controlled)
            .field("ids", &self.ids)
            .field("circular", &self.circular)
            .field("timer", &self.timer)
            .field("announcer", &self.announcer)
            .field("effects", &self.effects)
            .field("environment", &self.environment)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "tracing")]
fn log_transition<T>(kind: ActionKind, state: &SelectionState<T>) {
    tracing::debug!(
        message = "select.transition",
        action = kind.as_str(),
        is_open = state.is_open,
        highlighted_index = ?state.highlighted_index,
        has_selection = state.selected_item.is_some(),
        typeahead_len = state.typeahead.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::RecordingEnvironment;
    use crate::event::KeyCode;
    use std::cell::RefCell;
    use web_time::Duration;
    #[cfg(feature = "tracing")]
    use std::sync::{Arc, Mutex};
    #[cfg(feature = "tracing")]
    use tracing::Subscriber;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::Layer;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::layer::{Context, SubscriberExt};

    const FRUIT: [&str; 3] = ["Banana", "Apple", "Avocado"];

    fn fruit() -> SelectConfig<&'static str> {
        SelectConfig::new(FRUIT.to_vec()).with_id("fruit")
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key_code(code)
    }

    fn render<T: Clone + 'static, E: Environment>(select: &mut Select<T, E>) {
        select.begin_render();
        let _toggle = select.toggle_button_props(None);
        let menu = select.menu_props(None);
        menu.ref_slot.bind();
    }

    #[test]
    fn enter_commits_once() {
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let mut select = Select::new(fruit().on_state_change(move |event| {
            sink.borrow_mut().push(event.changes.clone());
        }));
        select.handle_input(ElementRole::ToggleButton, &key(KeyCode::Down));
        select.handle_input(ElementRole::Menu, &key(KeyCode::Down));
        commits.borrow_mut().clear();

        select.handle_input(ElementRole::Menu, &key(KeyCode::Enter));
        let commits = commits.borrow();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].selected_item, Some(Some("Apple")));
        assert_eq!(commits[0].is_open, Some(false));
        assert_eq!(commits[0].highlighted_index, Some(None));
    }

    #[test]
    fn initial_values_seed_state() {
        let select = Select::new(
            fruit()
                .with_initial_is_open(true)
                .with_initial_selected_item(Some("Avocado")),
        );
        assert!(select.is_open());
        assert_eq!(select.highlighted_index(), Some(2));
        assert_eq!(select.selected_item(), Some(&"Avocado"));
    }

    #[test]
    fn partial_reducer_falls_back_to_proposal() {
        let mut select = Select::new(fruit().with_state_reducer(
            |_: &SelectionState<&'static str>,
             action: &Action<&'static str>,
             changes: StateChanges<&'static str>| {
                if action.kind == ActionKind::MenuKeyDownEnter {
                    // Keep the menu open; other fields come from the proposal.
                    StateChanges::new().open(true)
                } else {
                    changes
                }
            },
        ));
        select.open_menu();
        select.handle_input(ElementRole::Menu, &key(KeyCode::Enter));
        assert!(select.is_open());
        assert_eq!(select.selected_item(), Some(&"Banana"));
    }

    #[test]
    fn typeahead_expires_on_tick() {
        let mut select = Select::new(fruit());
        let t0 = Instant::now();
        select.dispatch_at(Action::new(ActionKind::FunctionOpenMenu), t0);
        select.handle_input_at(ElementRole::Menu, &key(KeyCode::Char('a')), t0);
        assert_eq!(select.typeahead(), "a");
        assert_eq!(select.next_deadline(), Some(t0 + Duration::from_millis(500)));

        select.tick(t0 + Duration::from_millis(499));
        assert_eq!(select.typeahead(), "a");
        select.tick(t0 + Duration::from_millis(500));
        assert_eq!(select.typeahead(), "");
        assert_eq!(select.next_deadline(), None);
    }

    #[test]
    fn selection_is_announced_and_cleared() {
        let mut select = Select::with_environment(fruit(), RecordingEnvironment::new());
        let t0 = Instant::now();
        select.dispatch_at(
            Action::with_payload(ActionKind::FunctionSelectItem, Payload::Item(Some("Apple"))),
            t0,
        );
        assert_eq!(select.status_message(), Some("Apple has been selected."));
        assert_eq!(select.environment().announcements(), vec!["Apple has been selected."]);

        select.tick(t0 + Duration::from_millis(500));
        assert_eq!(select.status_message(), None);
    }

    #[test]
    fn custom_status_message() {
        let config = fruit().with_status_message(|context| {
            Some(format!("Picked {} of {}", context.selected_label, context.item_count))
        });
        let mut select = Select::new(config);
        select.select_item(Some("Banana"));
        assert_eq!(select.status_message(), Some("Picked Banana of 3"));
    }

    #[test]
    fn flush_scrolls_then_returns_focus() {
        let mut select = Select::with_environment(fruit(), RecordingEnvironment::new());
        select.handle_input(ElementRole::ToggleButton, &key(KeyCode::Up));
        render(&mut select);
        select.flush_effects();
        assert_eq!(select.environment().scrolled(), vec!["fruit-item-2"]);

        select.handle_input(ElementRole::Menu, &key(KeyCode::Escape));
        render(&mut select);
        select.flush_effects();
        assert_eq!(select.environment().focused(), vec!["fruit-toggle-button"]);
    }

    #[test]
    fn unbound_menu_drops_scroll() {
        let mut select = Select::with_environment(fruit(), RecordingEnvironment::new());
        select.open_menu();
        select.begin_render();
        select.flush_effects();
        assert!(select.environment().scrolled().is_empty());
    }

    #[test]
    fn scroll_override_receives_index() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let config = fruit().with_scroll_into_view(move |request, _env| {
            sink.borrow_mut().push(request.index);
            Ok(())
        });
        let mut select = Select::with_environment(config, RecordingEnvironment::new());
        select.open_menu();
        select.set_highlighted_index(Some(2));
        render(&mut select);
        select.flush_effects();
        assert_eq!(*seen.borrow(), vec![2]);
        assert!(select.environment().scrolled().is_empty());
    }

    #[test]
    fn verify_reports_missing_getters() {
        let mut select = Select::new(fruit());
        assert!(select.verify_prop_getters().is_ok());

        select.begin_render();
        let _toggle = select.toggle_button_props(None);
        assert_eq!(
            select.verify_prop_getters(),
            Err(SelectError::PropGetterNotCalled {
                getter: "menu_props"
            })
        );

        let menu = select.menu_props(None);
        assert_eq!(
            select.verify_prop_getters(),
            Err(SelectError::MenuRefNotBound {
                menu_id: "fruit-menu".to_string()
            })
        );
        menu.ref_slot.bind();
        assert!(select.verify_prop_getters().is_ok());
    }

    #[test]
    fn set_items_clamps_highlight() {
        let mut select = Select::new(fruit());
        select.open_menu();
        select.set_highlighted_index(Some(2));
        select.set_items(vec!["Banana"]);
        assert_eq!(select.highlighted_index(), Some(0));
        select.set_items(Vec::new());
        assert_eq!(select.highlighted_index(), None);
    }

    #[test]
    fn teardown_cancels_deadlines() {
        let mut select = Select::with_environment(fruit(), RecordingEnvironment::new());
        let t0 = Instant::now();
        select.dispatch_at(Action::new(ActionKind::FunctionOpenMenu), t0);
        select.handle_input_at(ElementRole::Menu, &key(KeyCode::Char('b')), t0);
        select.select_item(Some("Banana"));
        select.teardown();

        assert_eq!(select.next_deadline(), None);
        assert_eq!(select.status_message(), None);
        assert!(!select.handle_input(ElementRole::Menu, &key(KeyCode::Down)));
        assert!(select.is_torn_down());
    }

    #[test]
    fn blur_to_menu_keeps_open() {
        let mut select = Select::with_environment(fruit(), RecordingEnvironment::new());
        select.open_menu();
        let handled = select.handle_input(
            ElementRole::ToggleButton,
            &InputEvent::blur(Some("fruit-menu")),
        );
        assert!(!handled);
        assert!(select.is_open());

        select.handle_input(ElementRole::Menu, &InputEvent::blur(Some("elsewhere")));
        assert!(!select.is_open());
        assert_eq!(select.selected_item(), Some(&"Banana"));
    }

    #[test]
    fn controlled_open_update_plans_focus() {
        let mut select = Select::with_environment(fruit().with_is_open(true), RecordingEnvironment::new());
        assert!(select.is_open());
        select.update_controlled(|controlled| controlled.is_open = Some(false));
        assert!(!select.is_open());
        assert!(select.pending_effects().restore_focus());
    }

    #[cfg(feature = "tracing")]
    #[derive(Debug, Default)]
    struct SelectTraceState {
        transitions: usize,
        announcements: usize,
        has_action_field: bool,
        ignored_roles: Vec<String>,
    }

    #[cfg(feature = "tracing")]
    struct SelectTraceCapture {
        state: Arc<Mutex<SelectTraceState>>,
    }

    #[cfg(feature = "tracing")]
    impl<S> Layer<S> for SelectTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct MessageVisitor {
                message: Option<String>,
                role: Option<String>,
            }
            impl tracing::field::Visit for MessageVisitor {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    match field.name() {
                        "message" => self.message = Some(value.to_owned()),
                        "role" => self.role = Some(value.to_owned()),
                        _ => {}
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_owned());
                    }
                }
            }
            let mut visitor = MessageVisitor {
                message: None,
                role: None,
            };
            event.record(&mut visitor);
            let mut state = self.state.lock().expect("select trace state lock");
            match visitor.message.as_deref() {
                Some("select.transition") => {
                    state.transitions += 1;
                    state.has_action_field |= event.metadata().fields().field("action").is_some();
                }
                Some("select.announce") => state.announcements += 1,
                Some("select.input") => state.ignored_roles.extend(visitor.role),
                _ => {}
            }
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn transitions_and_announcements_are_traced() {
        let trace_state = Arc::new(Mutex::new(SelectTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(SelectTraceCapture {
            state: Arc::clone(&trace_state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let mut select = Select::new(fruit());
        select.handle_input(ElementRole::ToggleButton, &key(KeyCode::Down));
        select.handle_input(ElementRole::Menu, &key(KeyCode::Enter));
        select.handle_input(ElementRole::Label, &InputEvent::click());

        tracing::callsite::rebuild_interest_cache();
        let snapshot = trace_state.lock().expect("select trace state lock");
        assert_eq!(snapshot.ignored_roles, vec!["label".to_string()]);
        assert!(snapshot.transitions >= 2, "expected select.transition events");
        assert!(snapshot.has_action_field, "select.transition missing action");
        assert_eq!(snapshot.announcements, 1, "expected one select.announce event");
    }
}
