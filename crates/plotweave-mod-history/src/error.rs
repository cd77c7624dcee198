//! Error types for the history engine.

use thiserror::Error;

/// Errors raised by [`HistoryManager`](crate::HistoryManager).
///
/// Both variants are integration mistakes rather than runtime conditions.
/// Undoing or redoing with an empty stack is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history used before initialize: {operation}")]
    Uninitialized { operation: &'static str },

    #[error("history capacity must be positive, got {0}")]
    InvalidCapacity(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HistoryError::Uninitialized { operation: "undo" };
        assert_eq!(err.to_string(), "history used before initialize: undo");

        let err = HistoryError::InvalidCapacity(0);
        assert_eq!(err.to_string(), "history capacity must be positive, got 0");
    }
}
