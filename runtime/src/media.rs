//! Media resilience helper.
//!
//! Autoplay policies reject unattended playback freely; the helper keeps
//! embedded media playing anyway. Unattended attempts run muted (unless the
//! user explicitly unmuted the element), a rejected attempt earns exactly one
//! delayed retry that is always muted, and a one-shot gesture-armed retry
//! covers the case where only a real user interaction unlocks playback.
//! Rejections are diagnostics, never surfaced.

use std::time::Duration;

use hashnav_core::{MediaElement, TransitionTiming};

/// Bring every paused element toward a playing state.
///
/// Idempotent: playing elements are skipped, and the armed marker keeps
/// repeated passes from stacking gesture listeners on the same element.
pub fn ensure_playing<M: MediaElement>(elements: &[M], timing: &TransitionTiming) {
    for element in elements {
        if !element.is_paused() {
            continue;
        }

        // Muting is what autoplay policy demands for unattended playback; an
        // explicit prior unmute by the user wins over it.
        if !element.user_unmuted() {
            element.set_muted(true);
        }
        if !element.has_started_loading() {
            element.load();
        }

        attempt_play(element.clone(), timing.play_retry);

        if !element.has_inline_play_trigger() && !element.retry_armed() {
            element.mark_retry_armed();
            arm_gesture_retry(element.clone());
        }
    }
}

/// One play attempt with a single bounded retry. The retry always forces
/// mute, whatever the unmute marker says: second chances are policy-compliant.
fn attempt_play<M: MediaElement>(element: M, retry_after: Duration) {
    tokio::spawn(async move {
        let Err(err) = element.play().await else {
            return;
        };
        tracing::warn!(error = %err, "play attempt rejected, retrying muted");
        tokio::time::sleep(retry_after).await;
        element.set_muted(true);
        if let Err(err) = element.play().await {
            tracing::warn!(error = %err, "second play attempt failed");
        }
    });
}

/// Await the element's next user interaction, then try to play once without
/// touching the mute state.
fn arm_gesture_retry<M: MediaElement>(element: M) {
    tokio::spawn(async move {
        element.next_gesture().await;
        if let Err(err) = element.play().await {
            tracing::warn!(error = %err, "play after user gesture failed");
        }
    });
}

/// Single unattended play attempt per paused element, no retry. Used by the
/// document-level first-interaction resume.
pub fn resume_all<M: MediaElement>(elements: &[M]) {
    for element in elements {
        if !element.is_paused() {
            continue;
        }
        if !element.user_unmuted() {
            element.set_muted(true);
        }
        let element = element.clone();
        tokio::spawn(async move {
            if let Err(err) = element.play().await {
                tracing::warn!(error = %err, "play on first interaction failed");
            }
        });
    }
}
