#![forbid(unsafe_code)]

//! Injected document/window capability.
//!
//! The engine never touches a global document. Focus changes, scroll
//! requests, containment probes, live-region updates and synthesized ids all
//! go through the
//! [`Environment`] a [`Select`](crate::select::Select) was built with, so the
//! same engine works inside embedded or alternate documents (iframes,
//! off-screen buffers, terminal panes).

use crate::error::{Result, SelectError};

/// Focus, scroll, and containment probing for one hosting document.
pub trait Environment {
    /// Move focus to the element with `element_id`.
    fn focus(&mut self, element_id: &str) -> Result<()>;

    /// Scroll `item_id` into view inside the scrollable `container_id`.
    fn scroll_into_view(&mut self, item_id: &str, container_id: &str) -> Result<()>;

    /// Id of the element that currently holds focus, if known.
    ///
    /// Focus return is skipped when this already names the toggle control.
    fn active_element(&self) -> Option<String> {
        None
    }

    /// A base id for a select built without one.
    ///
    /// Hosts that render several instances into one document must return
    /// ids that are unique within it. The default returns `prefix`.
    fn unique_id(&mut self, prefix: &str) -> String {
        prefix.to_string()
    }

    /// Whether `element_id` is `ancestor_id` or one of its descendants.
    fn contains(&self, ancestor_id: &str, element_id: &str) -> bool {
        ancestor_id == element_id
    }

    /// Publish `message` to the live region. An empty message clears it.
    fn announce(&mut self, _message: &str) {}
}

/// Environment with no document attached; every request is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetachedEnvironment;

impl Environment for DetachedEnvironment {
    fn focus(&mut self, _element_id: &str) -> Result<()> {
        Ok(())
    }

    fn scroll_into_view(&mut self, _item_id: &str, _container_id: &str) -> Result<()> {
        Ok(())
    }
}

/// A request observed by a [`RecordingEnvironment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentRequest {
    /// Focus moved to an element.
    Focus(String),
    /// An item was scrolled into view.
    ScrollIntoView {
        /// Item element id.
        item_id: String,
        /// Scroll container id.
        container_id: String,
    },
    /// The live region was updated.
    Announce(String),
}

/// Headless environment that records every request in order.
///
/// Element ids registered with [`with_element`](Self::with_element) are
/// treated as present; requests naming any other id fail with
/// [`SelectError::ElementNotFound`]. With no registered elements every id is
/// accepted. Containment is declared with [`with_child`](Self::with_child).
#[derive(Debug, Clone, Default)]
pub struct RecordingEnvironment {
    requests: Vec<EnvironmentRequest>,
    elements: Vec<String>,
    children: Vec<(String, String)>,
    active: Option<String>,
    next_id: u32,
}

impl RecordingEnvironment {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element id as present in the document.
    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.elements.push(id.into());
        self
    }

    /// Declare `child` as a descendant of `parent`.
    #[must_use]
    pub fn with_child(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.children.push((parent.into(), child.into()));
        self
    }

    /// Start with focus on `id`.
    #[must_use]
    pub fn with_active_element(mut self, id: impl Into<String>) -> Self {
        self.active = Some(id.into());
        self
    }

    /// Every request seen so far.
    #[must_use]
    pub fn requests(&self) -> &[EnvironmentRequest] {
        &self.requests
    }

    /// Ids focused so far, in order.
    #[must_use]
    pub fn focused(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                EnvironmentRequest::Focus(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Item ids scrolled into view so far, in order.
    #[must_use]
    pub fn scrolled(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                EnvironmentRequest::ScrollIntoView { item_id, .. } => Some(item_id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Non-empty live-region messages so far, in order.
    #[must_use]
    pub fn announcements(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                EnvironmentRequest::Announce(message) if !message.is_empty() => {
                    Some(message.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Forget recorded requests.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.elements.is_empty() || self.elements.iter().any(|known| known == id) {
            Ok(())
        } else {
            Err(SelectError::not_found(id))
        }
    }
}

impl Environment for RecordingEnvironment {
    fn focus(&mut self, element_id: &str) -> Result<()> {
        self.check(element_id)?;
        self.active = Some(element_id.to_string());
        self.requests
            .push(EnvironmentRequest::Focus(element_id.to_string()));
        Ok(())
    }

    fn scroll_into_view(&mut self, item_id: &str, container_id: &str) -> Result<()> {
        self.check(container_id)?;
        self.check(item_id)?;
        self.requests.push(EnvironmentRequest::ScrollIntoView {
            item_id: item_id.to_string(),
            container_id: container_id.to_string(),
        });
        Ok(())
    }

    fn active_element(&self) -> Option<String> {
        self.active.clone()
    }

    fn unique_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn contains(&self, ancestor_id: &str, element_id: &str) -> bool {
        ancestor_id == element_id
            || self
                .children
                .iter()
                .any(|(parent, child)| parent == ancestor_id && child == element_id)
    }

    fn announce(&mut self, message: &str) {
        self.requests
            .push(EnvironmentRequest::Announce(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_accepts_everything() {
        let mut env = DetachedEnvironment;
        assert!(env.focus("anything").is_ok());
        assert!(env.scroll_into_view("a", "b").is_ok());
        assert!(env.contains("x", "x"));
        assert!(!env.contains("x", "y"));
        assert_eq!(env.unique_id("ftui-select"), "ftui-select");
        assert_eq!(env.active_element(), None);
    }

    #[test]
    fn recorder_ids_count_per_document() {
        let mut first = RecordingEnvironment::new();
        let mut second = RecordingEnvironment::new();
        assert_eq!(first.unique_id("ftui-select"), "ftui-select-0");
        assert_eq!(first.unique_id("ftui-select"), "ftui-select-1");
        assert_eq!(second.unique_id("ftui-select"), "ftui-select-0");
    }

    #[test]
    fn recorder_keeps_order() {
        let mut env = RecordingEnvironment::new();
        env.focus("toggle").unwrap();
        env.scroll_into_view("item-2", "menu").unwrap();
        env.announce("Apple has been selected.");
        env.announce("");

        assert_eq!(env.focused(), vec!["toggle"]);
        assert_eq!(env.scrolled(), vec!["item-2"]);
        assert_eq!(env.announcements(), vec!["Apple has been selected."]);
        assert_eq!(env.requests().len(), 4);
        assert_eq!(env.active_element().as_deref(), Some("toggle"));
    }

    #[test]
    fn recorder_rejects_unknown_elements() {
        let mut env = RecordingEnvironment::new().with_element("toggle");
        assert!(env.focus("toggle").is_ok());
        assert_eq!(env.focus("ghost"), Err(SelectError::not_found("ghost")));
    }

    #[test]
    fn recorder_containment() {
        let env = RecordingEnvironment::new().with_child("menu", "menu-footer");
        assert!(env.contains("menu", "menu-footer"));
        assert!(!env.contains("toggle", "menu-footer"));
    }
}
