//! Navigation state - the only mutable state in the subsystem.
//!
//! `NavState` is owned exclusively by the transition engine. Everything else
//! observes it indirectly through effects (fragment, active link, content).

/// Visual phase of the content area.
///
/// The two timed phases are named instead of living as anonymous nested
/// timers: `Exiting` covers the outgoing effect, `Entering` the incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Exiting,
    Entering,
}

/// Current page, mutual-exclusion flag, and the single pending slot.
///
/// Invariants:
/// - `pending` is non-empty only while `in_transition` is true.
/// - `pending` holds at most the most recent request received during the
///   transition; earlier requests are superseded (last-write-wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub current: String,
    pub in_transition: bool,
    pending: Option<String>,
}

impl NavState {
    /// State at startup, with `current` derived from the fragment (or the
    /// default page when the fragment is absent).
    pub fn starting_at(page: impl Into<String>) -> Self {
        Self {
            current: page.into(),
            in_transition: false,
            pending: None,
        }
    }

    /// Record a navigation request received mid-transition, overwriting any
    /// previously queued one. Ignored when no transition is in flight; the
    /// pending slot exists only inside that window.
    pub fn queue_pending(&mut self, page: impl Into<String>) {
        if self.in_transition {
            self.pending = Some(page.into());
        }
    }

    /// Drop any queued request. Called when a fresh transition starts so a
    /// stale request cannot leak into the new window.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Consume the queued request, if any.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}
