#![forbid(unsafe_code)]

//! Select: a headless, accessible listbox/combobox state engine.
//!
//! # Role in FrankenTUI
//! `ftui-select` drives a custom "select" widget that behaves like a native
//! form control. It owns no rendering: a renderer asks it for property
//! bundles, forwards input back to it, and draws whatever state it reports.
//!
//! # Primary responsibilities
//! - **Select**: per-instance engine owning state, timer, announcer, and
//!   pending side effects.
//! - **Reducer**: the default transition policy plus a caller override seam.
//! - **Mapper**: raw key/pointer/focus events to semantic actions.
//! - **Props**: id, ARIA, and handler bundles for label, toggle, menu, and
//!   items.
//! - **Environment**: injected focus/scroll/live-region capability.
//!
//! # How it fits in the system
//! Transitions are synchronous and infallible. The only time-based pieces,
//! the type-ahead window and the status message lifetime, are deadlines the
//! host advances with [`Select::tick`], so the engine runs identically in a
//! terminal event loop, a browser via wasm, or a deterministic test.

pub mod action;
pub mod announcer;
pub mod config;
pub mod effects;
pub mod environment;
pub mod error;
pub mod event;
pub mod mapper;
pub mod props;
pub mod reducer;
pub mod select;
pub mod state;
pub mod typeahead;

pub use action::{Action, ActionKind, Origin, Payload};
pub use config::{SelectConfig, TimingConfig};
pub use environment::{DetachedEnvironment, Environment, RecordingEnvironment};
pub use error::{Result, SelectError};
pub use event::{ElementRole, InputEvent, KeyCode, KeyEvent, Modifiers};
pub use reducer::StateReducer;
pub use select::Select;
pub use state::{ControlledProps, SelectionState, StateChangeEvent, StateChanges};
