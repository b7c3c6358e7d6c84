//! # Ingress - Boundary Adapter
//!
//! Translates host-side interaction events into engine calls. The host keeps
//! owning its event plumbing; it hands this adapter the nearest link target
//! of an activation, or a bare history-change signal, and honors the returned
//! [`Disposition`].
//!
//! The adapter holds no state of its own. In-flight branching (queue the
//! request, move the indicator eagerly) reads the engine's state and routes
//! re-entrant requests into the single pending slot instead of starting a
//! second transition.

use std::sync::Arc;

use hashnav_core::Host;
use hashnav_runtime::Engine;

/// What the host should do with the activation it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The adapter consumed the activation; suppress default navigation.
    Handled,
    /// Not a same-document fragment link; let default navigation proceed.
    PassThrough,
}

/// Boundary adapter over a shared [`Engine`].
pub struct Ingress<H: Host> {
    engine: Arc<Engine<H>>,
}

impl<H: Host> Ingress<H> {
    pub fn new(engine: Arc<Engine<H>>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<Engine<H>> {
        &self.engine
    }

    /// Startup wiring: adopt the page named by the current fragment (or the
    /// default), load its content, and set the active link.
    pub fn start(&self) {
        let page = self.engine.fragment_or_default();
        self.engine.load_in_place(&page);
        self.engine.set_active_link(&page);
    }

    /// Handle a link activation.
    ///
    /// `href` is the target of the nearest enclosing link-like ancestor of
    /// the activated element, or `None` when there is none. Anything that is
    /// not a same-document fragment reference passes through untouched.
    pub fn handle_link_activation(&self, href: Option<&str>) -> Disposition {
        let Some(href) = href else {
            return Disposition::PassThrough;
        };
        let Some(page) = href.strip_prefix('#') else {
            tracing::debug!(href, "non-fragment link left to default navigation");
            return Disposition::PassThrough;
        };

        if page == self.engine.current_page() {
            // Repeated activation of the active page's link: no work, no
            // URL churn.
            return Disposition::Handled;
        }

        // Check-and-queue is atomic on the engine side: a transition
        // completing concurrently either drains the queued request or
        // reports idle, in which case we navigate directly.
        if self.engine.queue_pending(page) {
            // The indicator is allowed to run ahead of the content.
            self.engine.set_active_link(page);
            return Disposition::Handled;
        }

        self.engine.navigate(page);
        Disposition::Handled
    }

    /// Handle a browser-level history navigation signal. The platform has
    /// already moved the fragment, so the engine adopts the page without
    /// writing the URL again.
    pub fn handle_history_change(&self) {
        let page = self.engine.fragment_or_default();
        if page == self.engine.current_page() {
            return;
        }

        if self.engine.queue_pending(&page) {
            return;
        }

        self.engine.load_in_place(&page);
    }
}
