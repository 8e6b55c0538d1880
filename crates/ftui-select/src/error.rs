//! Error types for the environment boundary and render-time verification.
//!
//! State transitions never fail. Errors only come from the injected
//! [`Environment`](crate::environment::Environment) (focus/scroll requests
//! that cannot be honoured) and from [`Select::verify_prop_getters`].
//!
//! [`Select::verify_prop_getters`]: crate::select::Select::verify_prop_getters

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("element not found in environment: {id}")]
    ElementNotFound { id: String },

    #[error("prop getter was not called during render: {getter}")]
    PropGetterNotCalled { getter: &'static str },

    #[error("menu ref slot was not bound to a container: {menu_id}")]
    MenuRefNotBound { menu_id: String },

    #[error("environment unavailable: {reason}")]
    Environment { reason: String },
}

impl SelectError {
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ElementNotFound { id: id.into() }
    }

    #[must_use]
    pub fn environment(reason: impl Into<String>) -> Self {
        Self::Environment {
            reason: reason.into(),
        }
    }
}
