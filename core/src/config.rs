//! Transition timing configuration.
//!
//! The engine waits on these durations; it does not own them. Defaults match
//! the visual effect durations the content styling is built around.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed durations for the two transition phases and the bounded play retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Outgoing visual effect (content still shows the old page).
    pub exit: Duration,
    /// Incoming visual effect (new content already swapped in).
    pub enter: Duration,
    /// Delay before the single muted retry after a rejected play attempt.
    pub play_retry: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(400),
            enter: Duration::from_millis(500),
            play_retry: Duration::from_millis(1000),
        }
    }
}

impl TransitionTiming {
    /// Build timing from `HASHNAV_EXIT_MS`, `HASHNAV_ENTER_MS` and
    /// `HASHNAV_PLAY_RETRY_MS` millisecond variables.
    ///
    /// Unset or unparsable variables keep the default, with a warning log for
    /// the unparsable case.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            exit: env_millis("HASHNAV_EXIT_MS", defaults.exit),
            enter: env_millis("HASHNAV_ENTER_MS", defaults.enter),
            play_retry: env_millis("HASHNAV_PLAY_RETRY_MS", defaults.play_retry),
        }
    }

    /// Total span of a transition, ignoring work between the phases.
    pub fn total(&self) -> Duration {
        self.exit + self.enter
    }
}

fn env_millis(var: &str, default: Duration) -> Duration {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                tracing::warn!(var, value = %raw, "ignoring unparsable duration override");
                default
            }
        },
        Err(_) => default,
    }
}
