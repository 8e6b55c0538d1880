#![forbid(unsafe_code)]

//! Construction-time configuration for a [`Select`](crate::select::Select).
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `FTUI_SELECT_TYPEAHEAD_TIMEOUT_MS` | u64 | 500 | Type-ahead window |
//! | `FTUI_SELECT_STATUS_CLEAR_MS` | u64 | 500 | Live-region message lifetime |
//!
//! # Example
//!
//! ```
//! use ftui_select::config::{SelectConfig, TimingConfig};
//! use std::time::Duration;
//!
//! let config = SelectConfig::new(vec!["Banana", "Apple", "Avocado"])
//!     .with_id("fruit")
//!     .with_initial_selected_item(Some("Apple"))
//!     .with_circular_navigation(false)
//!     .with_timing(TimingConfig::default().with_typeahead_timeout(Duration::from_millis(700)));
//! assert_eq!(config.items().len(), 3);
//! ```

use std::fmt;

use web_time::Duration;

use crate::announcer::{StatusContext, StatusMessageFn, default_status_message};
use crate::effects::{ScrollIntoViewFn, ScrollRequest};
use crate::environment::Environment;
use crate::error::Result;
use crate::reducer::StateReducer;
use crate::state::{ControlledProps, StateChangeEvent};

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Default type-ahead window.
pub const DEFAULT_TYPEAHEAD_TIMEOUT_MS: u64 = 500;

/// Minimum allowed type-ahead window.
pub const MIN_TYPEAHEAD_TIMEOUT_MS: u64 = 100;

/// Maximum allowed type-ahead window.
pub const MAX_TYPEAHEAD_TIMEOUT_MS: u64 = 5_000;

/// Default lifetime of a live-region message.
pub const DEFAULT_STATUS_CLEAR_MS: u64 = 500;

/// Minimum allowed live-region message lifetime.
pub const MIN_STATUS_CLEAR_MS: u64 = 50;

/// Maximum allowed live-region message lifetime.
pub const MAX_STATUS_CLEAR_MS: u64 = 10_000;

/// Timer windows for one select instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// How long typed characters accumulate before the buffer clears.
    pub typeahead_timeout: Duration,
    /// How long an announcement stays in the live region.
    pub status_clear_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typeahead_timeout: Duration::from_millis(DEFAULT_TYPEAHEAD_TIMEOUT_MS),
            status_clear_delay: Duration::from_millis(DEFAULT_STATUS_CLEAR_MS),
        }
    }
}

impl TimingConfig {
    /// Set the type-ahead window.
    #[must_use]
    pub fn with_typeahead_timeout(mut self, timeout: Duration) -> Self {
        self.typeahead_timeout = timeout;
        self
    }

    /// Set the live-region message lifetime.
    #[must_use]
    pub fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.status_clear_delay = delay;
        self
    }

    /// Load timing from environment variables, clamped to valid ranges.
    ///
    /// Reads:
    /// - `FTUI_SELECT_TYPEAHEAD_TIMEOUT_MS`
    /// - `FTUI_SELECT_STATUS_CLEAR_MS`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    ///
    /// Unset or unparsable variables keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("FTUI_SELECT_TYPEAHEAD_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.typeahead_timeout = Duration::from_millis(ms);
        }

        if let Some(val) = lookup("FTUI_SELECT_STATUS_CLEAR_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.status_clear_delay = Duration::from_millis(ms);
        }

        config.validated()
    }

    /// Clamp both windows to their valid ranges.
    ///
    /// ```
    /// use ftui_select::config::TimingConfig;
    /// use std::time::Duration;
    ///
    /// let config = TimingConfig::default()
    ///     .with_typeahead_timeout(Duration::from_millis(10))
    ///     .validated();
    /// assert_eq!(config.typeahead_timeout.as_millis(), 100);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        let timeout_ms = self.typeahead_timeout.as_millis() as u64;
        self.typeahead_timeout = Duration::from_millis(
            timeout_ms.clamp(MIN_TYPEAHEAD_TIMEOUT_MS, MAX_TYPEAHEAD_TIMEOUT_MS),
        );

        let clear_ms = self.status_clear_delay.as_millis() as u64;
        self.status_clear_delay =
            Duration::from_millis(clear_ms.clamp(MIN_STATUS_CLEAR_MS, MAX_STATUS_CLEAR_MS));

        self
    }

    /// Check if both windows are within their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let timeout_ms = self.typeahead_timeout.as_millis() as u64;
        let clear_ms = self.status_clear_delay.as_millis() as u64;

        (MIN_TYPEAHEAD_TIMEOUT_MS..=MAX_TYPEAHEAD_TIMEOUT_MS).contains(&timeout_ms)
            && (MIN_STATUS_CLEAR_MS..=MAX_STATUS_CLEAR_MS).contains(&clear_ms)
    }
}

// ---------------------------------------------------------------------------
// Item functions
// ---------------------------------------------------------------------------

/// Display/type-ahead string of an item. `None` is treated as `""`.
pub type ItemToStringFn<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Item identity for highlight and selection purposes.
pub type ItemEqFn<T> = Box<dyn Fn(&T, &T) -> bool>;

/// Whether the item at an index is disabled.
pub type ItemDisabledFn<T> = Box<dyn Fn(&T, usize) -> bool>;

/// Element id of the item at an index.
pub type ItemIdFn = Box<dyn Fn(usize) -> String>;

/// Receives a change notification.
pub type ChangeHandler<T> = Box<dyn FnMut(&StateChangeEvent<T>)>;

/// The caller-supplied rules for reading items.
pub struct ItemFns<T> {
    pub(crate) to_string: ItemToStringFn<T>,
    pub(crate) eq: ItemEqFn<T>,
    pub(crate) is_disabled: ItemDisabledFn<T>,
}

impl<T> ItemFns<T> {
    /// Display string of `item`, `""` when the formatter yields nothing.
    #[must_use]
    pub fn label(&self, item: &T) -> String {
        (self.to_string)(item).unwrap_or_default()
    }

    /// Whether `a` and `b` are the same item.
    #[must_use]
    pub fn same(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    /// Whether `item` at `index` is disabled.
    #[must_use]
    pub fn disabled(&self, item: &T, index: usize) -> bool {
        (self.is_disabled)(item, index)
    }
}

impl<T> fmt::Debug for ItemFns<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemFns").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Element id overrides. Missing ids derive from `id`.
#[derive(Default)]
pub struct IdConfig {
    pub(crate) id: Option<String>,
    pub(crate) label_id: Option<String>,
    pub(crate) menu_id: Option<String>,
    pub(crate) toggle_button_id: Option<String>,
    pub(crate) item_id: Option<ItemIdFn>,
}

impl fmt::Debug for IdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdConfig")
            .field("id", &self.id)
            .field("label_id", &self.label_id)
            .field("menu_id", &self.menu_id)
            .field("toggle_button_id", &self.toggle_button_id)
            .field("item_id", &self.item_id.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Change handlers
// ---------------------------------------------------------------------------

/// Optional change notifications.
pub struct Callbacks<T> {
    pub(crate) on_selected_item_change: Option<ChangeHandler<T>>,
    pub(crate) on_highlighted_index_change: Option<ChangeHandler<T>>,
    pub(crate) on_is_open_change: Option<ChangeHandler<T>>,
    pub(crate) on_state_change: Option<ChangeHandler<T>>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_selected_item_change: None,
            on_highlighted_index_change: None,
            on_is_open_change: None,
            on_state_change: None,
        }
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_selected_item_change", &self.on_selected_item_change.is_some())
            .field(
                "on_highlighted_index_change",
                &self.on_highlighted_index_change.is_some(),
            )
            .field("on_is_open_change", &self.on_is_open_change.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SelectConfig
// ---------------------------------------------------------------------------

/// Seeds and defaults for the three public state fields.
///
/// `initial_*` seed the first state only; `default_*` are restored by
/// `reset()` and, for the highlight, whenever the menu closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeds<T> {
    pub(crate) initial_is_open: Option<bool>,
    pub(crate) default_is_open: bool,
    pub(crate) initial_highlighted_index: Option<usize>,
    pub(crate) default_highlighted_index: Option<usize>,
    pub(crate) initial_selected_item: Option<Option<T>>,
    pub(crate) default_selected_item: Option<T>,
}

impl<T> Default for Seeds<T> {
    fn default() -> Self {
        Self {
            initial_is_open: None,
            default_is_open: false,
            initial_highlighted_index: None,
            default_highlighted_index: None,
            initial_selected_item: None,
            default_selected_item: None,
        }
    }
}

/// Everything a [`Select`](crate::select::Select) is built from.
pub struct SelectConfig<T> {
    pub(crate) items: Vec<T>,
    pub(crate) item_fns: ItemFns<T>,
    pub(crate) seeds: Seeds<T>,
    pub(crate) controlled: ControlledProps<T>,
    pub(crate) ids: IdConfig,
    pub(crate) state_reducer: Option<Box<dyn StateReducer<T>>>,
    pub(crate) callbacks: Callbacks<T>,
    pub(crate) scroll_into_view: Option<ScrollIntoViewFn>,
    pub(crate) status_message: StatusMessageFn<T>,
    pub(crate) circular_navigation: bool,
    pub(crate) timing: TimingConfig,
}

impl<T> SelectConfig<T>
where
    T: fmt::Display + PartialEq + 'static,
{
    /// Config over `items` using `Display` for labels and `PartialEq` for
    /// identity.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self::with_item_fns(items, |item: &T| Some(item.to_string()), |a: &T, b: &T| a == b)
    }

    /// [`new`](Self::new) with timing read by [`TimingConfig::from_env`].
    #[must_use]
    pub fn from_env(items: Vec<T>) -> Self {
        Self::new(items).with_timing(TimingConfig::from_env())
    }
}

impl<T: 'static> SelectConfig<T> {
    /// Config over `items` with explicit label and identity rules.
    #[must_use]
    pub fn with_item_fns(
        items: Vec<T>,
        item_to_string: impl Fn(&T) -> Option<String> + 'static,
        item_eq: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self {
            items,
            item_fns: ItemFns {
                to_string: Box::new(item_to_string),
                eq: Box::new(item_eq),
                is_disabled: Box::new(|_, _| false),
            },
            seeds: Seeds::default(),
            controlled: ControlledProps::default(),
            ids: IdConfig::default(),
            state_reducer: None,
            callbacks: Callbacks::default(),
            scroll_into_view: None,
            status_message: Box::new(default_status_message),
            circular_navigation: true,
            timing: TimingConfig::default(),
        }
    }

    /// The configured items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Override the display/type-ahead string.
    #[must_use]
    pub fn with_item_to_string(mut self, f: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.item_fns.to_string = Box::new(f);
        self
    }

    /// Override item identity.
    #[must_use]
    pub fn with_item_eq(mut self, f: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.item_fns.eq = Box::new(f);
        self
    }

    /// Mark items as disabled; navigation skips them and clicks are ignored.
    #[must_use]
    pub fn with_item_disabled(mut self, f: impl Fn(&T, usize) -> bool + 'static) -> Self {
        self.item_fns.is_disabled = Box::new(f);
        self
    }

    /// Controlled `selected_item`: the engine always reports this value.
    #[must_use]
    pub fn with_selected_item(mut self, item: Option<T>) -> Self {
        self.controlled.selected_item = Some(item);
        self
    }

    /// Seed the first selection.
    #[must_use]
    pub fn with_initial_selected_item(mut self, item: Option<T>) -> Self {
        self.seeds.initial_selected_item = Some(item);
        self
    }

    /// Selection restored by `reset()`.
    #[must_use]
    pub fn with_default_selected_item(mut self, item: Option<T>) -> Self {
        self.seeds.default_selected_item = item;
        self
    }

    /// Controlled `highlighted_index`.
    #[must_use]
    pub fn with_highlighted_index(mut self, index: Option<usize>) -> Self {
        self.controlled.highlighted_index = Some(index);
        self
    }

    /// Seed the first highlight (also preferred on the first open).
    #[must_use]
    pub fn with_initial_highlighted_index(mut self, index: usize) -> Self {
        self.seeds.initial_highlighted_index = Some(index);
        self
    }

    /// Highlight restored on close and reset, and preferred on open.
    #[must_use]
    pub fn with_default_highlighted_index(mut self, index: usize) -> Self {
        self.seeds.default_highlighted_index = Some(index);
        self
    }

    /// Controlled `is_open`.
    #[must_use]
    pub fn with_is_open(mut self, is_open: bool) -> Self {
        self.controlled.is_open = Some(is_open);
        self
    }

    /// Seed the first open state.
    #[must_use]
    pub fn with_initial_is_open(mut self, is_open: bool) -> Self {
        self.seeds.initial_is_open = Some(is_open);
        self
    }

    /// Open state restored by `reset()`.
    #[must_use]
    pub fn with_default_is_open(mut self, is_open: bool) -> Self {
        self.seeds.default_is_open = is_open;
        self
    }

    /// Base id from which missing element ids derive.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.ids.id = Some(id.into());
        self
    }

    /// Label element id.
    #[must_use]
    pub fn with_label_id(mut self, id: impl Into<String>) -> Self {
        self.ids.label_id = Some(id.into());
        self
    }

    /// Menu element id.
    #[must_use]
    pub fn with_menu_id(mut self, id: impl Into<String>) -> Self {
        self.ids.menu_id = Some(id.into());
        self
    }

    /// Toggle control element id.
    #[must_use]
    pub fn with_toggle_button_id(mut self, id: impl Into<String>) -> Self {
        self.ids.toggle_button_id = Some(id.into());
        self
    }

    /// Item element id generator.
    #[must_use]
    pub fn with_item_id(mut self, f: impl Fn(usize) -> String + 'static) -> Self {
        self.ids.item_id = Some(Box::new(f));
        self
    }

    /// Install a state reducer that sees every proposed transition.
    #[must_use]
    pub fn with_state_reducer(mut self, reducer: impl StateReducer<T> + 'static) -> Self {
        self.state_reducer = Some(Box::new(reducer));
        self
    }

    /// Called when the proposed `selected_item` differs from the current one.
    #[must_use]
    pub fn on_selected_item_change(
        mut self,
        f: impl FnMut(&StateChangeEvent<T>) + 'static,
    ) -> Self {
        self.callbacks.on_selected_item_change = Some(Box::new(f));
        self
    }

    /// Called when the proposed `highlighted_index` differs from the current one.
    #[must_use]
    pub fn on_highlighted_index_change(
        mut self,
        f: impl FnMut(&StateChangeEvent<T>) + 'static,
    ) -> Self {
        self.callbacks.on_highlighted_index_change = Some(Box::new(f));
        self
    }

    /// Called when the proposed `is_open` differs from the current one.
    #[must_use]
    pub fn on_is_open_change(mut self, f: impl FnMut(&StateChangeEvent<T>) + 'static) -> Self {
        self.callbacks.on_is_open_change = Some(Box::new(f));
        self
    }

    /// Called once per transition that proposes any change.
    #[must_use]
    pub fn on_state_change(mut self, f: impl FnMut(&StateChangeEvent<T>) + 'static) -> Self {
        self.callbacks.on_state_change = Some(Box::new(f));
        self
    }

    /// Replace the scroll routine (e.g. scroll-by-index for virtual lists).
    #[must_use]
    pub fn with_scroll_into_view(
        mut self,
        f: impl FnMut(&ScrollRequest<'_>, &mut dyn Environment) -> Result<()> + 'static,
    ) -> Self {
        self.scroll_into_view = Some(Box::new(f));
        self
    }

    /// Replace the announcement formatter.
    #[must_use]
    pub fn with_status_message(
        mut self,
        f: impl Fn(&StatusContext<'_, T>) -> Option<String> + 'static,
    ) -> Self {
        self.status_message = Box::new(f);
        self
    }

    /// Enable or disable wraparound for arrow navigation.
    #[must_use]
    pub fn with_circular_navigation(mut self, enabled: bool) -> Self {
        self.circular_navigation = enabled;
        self
    }

    /// Set timer windows (validated on use).
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for SelectConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectConfig")
            .field("items", &self.items)
            .field("seeds", &self.seeds)
            .field("controlled", &self.controlled)
            .field("ids", &self.ids)
            .field("state_reducer", &self.state_reducer.is_some())
            .field("callbacks", &self.callbacks)
            .field("scroll_into_view", &self.scroll_into_view.is_some())
            .field("circular_navigation", &self.circular_navigation)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
