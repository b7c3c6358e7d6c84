//! The host seam - everything the engine does to the page.
//!
//! One trait because it is one document: content area, template store,
//! loading indicator, navigation links, scroll position, and the history
//! fragment all live on the same surface. The engine mutates the page only
//! through this trait; a host implementation wires it to a real platform,
//! while [`crate::memory::MemoryHost`] keeps it all in process for tests and
//! headless embedders.

use crate::media::MediaElement;
use crate::state::Phase;

/// An inert script-bearing element lifted out of freshly swapped content.
///
/// Cloned template content does not execute its scripts on any platform, so
/// the engine re-instantiates each one explicitly, preserving attributes and
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptSpec {
    pub attrs: Vec<(String, String)>,
    pub text: String,
}

impl ScriptSpec {
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            attrs: Vec::new(),
            text: text.into(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

/// Host page surface.
///
/// Methods taking `&mut self` are effects on the visible page; the engine
/// serializes them behind its own lock, so implementations do not need
/// interior synchronization.
pub trait Host: Send + 'static {
    /// An eagerly cloned instantiation of a content template. Cloning happens
    /// before the outgoing content is removed, so the clone cost never
    /// extends the time the old content sits visibly frozen.
    type Content: Send + 'static;

    /// Handle type for embedded media elements. Handles are cheap clones
    /// referring to the same underlying element.
    type Media: MediaElement;

    /// Clone the content of the template with the given identifier, or
    /// `None` when the template is absent from the page.
    fn clone_template(&self, template_id: &str) -> Option<Self::Content>;

    /// Replace the content area's children wholesale.
    fn swap_content(&mut self, content: Self::Content);

    /// Apply a named visual phase to the content area.
    fn set_phase(&mut self, phase: Phase);

    /// Raise or clear the page-change loading indicator.
    fn set_loading(&mut self, active: bool);

    /// Remove and return the inert scripts sitting in the content area.
    fn take_inert_scripts(&mut self) -> Vec<ScriptSpec>;

    /// Re-create one script element so it actually executes.
    fn instantiate_script(&mut self, script: ScriptSpec);

    /// Handles to every media element currently in the content area.
    fn media_elements(&self) -> Vec<Self::Media>;

    fn scroll_to_top(&mut self);

    /// Clear the "current" marker from all navigation links, then apply it
    /// to the single link targeting `page`. Silently does nothing when no
    /// link matches.
    fn set_active_link(&mut self, page: &str);

    /// Current URL fragment, without the leading `#`. `None` when absent.
    fn read_fragment(&self) -> Option<String>;

    /// Move the fragment to `page` without triggering a full navigation.
    fn push_fragment(&mut self, page: &str);
}
