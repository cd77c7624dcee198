/// Configuration for the history system.
use plotweave_config::{AppConfig, EditSurface, DEFAULT_HISTORY_CAPACITY};

/// Configuration for a single `HistoryManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Max snapshots kept on the undo stack. Must be positive.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HistoryConfig {
    /// Creates a config with the given undo depth.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Derives the history config for documents edited on `surface`.
    pub fn for_surface(app: &AppConfig, surface: EditSurface) -> Self {
        Self::new(app.capacity_for(surface))
    }
}
