use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_HISTORY: usize = 50;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// History tuning for an editor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps kept
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Quiet period before an edit burst becomes one history entry
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl EditorConfig {
    /// Replace a zero history depth with the default. A zero debounce is
    /// kept: edits commit on the next tick.
    pub fn with_defaults(mut self) -> Self {
        if self.max_history == 0 {
            self.max_history = DEFAULT_MAX_HISTORY;
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}
