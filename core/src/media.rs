//! Media element seam.
//!
//! Playback under restrictive autoplay policies is inherently fallible, so
//! `play` is async and returns a `Result`; the runtime's resilience helper
//! owns the retry policy. Elements are handles: cloning one refers to the
//! same underlying element, and mutation goes through `&self` the way a
//! platform element reference does.

use async_trait::async_trait;
use thiserror::Error;

/// Playback refused by the platform's autoplay policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback rejected by autoplay policy")]
pub struct PlayRejected;

/// A source of user interactions (tap or click).
///
/// `next_gesture` resolves on the next interaction after it is awaited;
/// awaiting it exactly once gives one-shot listener semantics. Implemented
/// both by individual media elements (gestures on the element) and by
/// document-level handles.
#[async_trait]
pub trait GestureSource: Send + Sync + 'static {
    async fn next_gesture(&self);
}

/// Handle to an embedded media element.
#[async_trait]
pub trait MediaElement: GestureSource + Clone {
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_paused(&self) -> bool;

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    /// True when the user has explicitly unmuted this element. A prior
    /// explicit user action must be respected: the first unattended play
    /// attempt never forces mute on such an element.
    fn user_unmuted(&self) -> bool;

    /// False while the element's ready state is still "nothing".
    fn has_started_loading(&self) -> bool;

    /// Kick off (or restart) loading of the element's media data.
    fn load(&self);

    /// Attempt to start playback. Non-blocking at the call site; settlement
    /// is asynchronous.
    async fn play(&self) -> Result<(), Self::Error>;

    /// True when the element already declares an inline play trigger, in
    /// which case no gesture-armed retry is attached.
    fn has_inline_play_trigger(&self) -> bool;

    /// True once a gesture-armed retry has been attached to this element.
    fn retry_armed(&self) -> bool;

    /// Record that a gesture-armed retry is attached, so repeated resilience
    /// passes do not accumulate listeners.
    fn mark_retry_armed(&self);
}
