/// Core undo/redo manager over immutable snapshots.
///
/// The history is split into a capped "past" stack, a single "present"
/// snapshot, and a "future" stack filled only by undo. Every operation is a
/// synchronous in-memory transition; none of them perform I/O.
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::config::HistoryConfig;
use crate::error::HistoryError;

/// Manages the linear undo/redo history of a single document.
///
/// Snapshots are stored as `Arc<S>` handles. The manager never inspects,
/// compares, or copies a snapshot; callers must not mutate a value after
/// handing it over. Identity is `Arc::ptr_eq`: `undo` and `redo` return the
/// very handles that were pushed.
///
/// `past.len() <= capacity` holds at all times. When the undo stack is full,
/// the oldest entry is dropped before the new one is appended.
pub struct HistoryManager<S: ?Sized> {
    /// Undo stack, oldest first. The back is the most recent entry.
    past: VecDeque<Arc<S>>,
    /// Current snapshot; `None` until the first `initialize`.
    present: Option<Arc<S>>,
    /// Redo stack, most-recently-undone on top.
    future: Vec<Arc<S>>,
    /// Max entries retained in `past`.
    capacity: NonZeroUsize,
}

impl<S: ?Sized> std::fmt::Debug for HistoryManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.past.len())
            .field("redo_count", &self.future.len())
            .field("initialized", &self.present.is_some())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<S: ?Sized> HistoryManager<S> {
    /// Creates an uninitialized manager retaining at most `capacity`
    /// undo entries.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(HistoryError::InvalidCapacity(capacity))?;
        Ok(Self {
            past: VecDeque::new(),
            present: None,
            future: Vec::new(),
            capacity,
        })
    }

    /// Creates an uninitialized manager from a [`HistoryConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCapacity`] if the configured capacity
    /// is zero.
    pub fn from_config(config: &HistoryConfig) -> Result<Self, HistoryError> {
        Self::new(config.capacity)
    }

    /// Seeds the history with `snapshot` and discards everything else.
    ///
    /// May be called again at any time, e.g. when another file is loaded
    /// into the same document; each call fully resets the history.
    pub fn initialize(&mut self, snapshot: impl Into<Arc<S>>) {
        let dropped = self.past.len() + self.future.len();
        self.past.clear();
        self.future.clear();
        self.present = Some(snapshot.into());
        tracing::debug!(dropped, "History initialized");
    }

    /// Commits `snapshot` as the new present state.
    ///
    /// The previous present moves onto the undo stack (evicting the oldest
    /// entry if the stack is full) and the redo stack is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] if `initialize` was never
    /// called. The history is left untouched in that case.
    pub fn push(&mut self, snapshot: impl Into<Arc<S>>) -> Result<(), HistoryError> {
        self.ensure_initialized("push")?;
        if let Some(previous) = self.present.replace(snapshot.into()) {
            self.push_past(previous);
        }
        if !self.future.is_empty() {
            tracing::trace!(discarded = self.future.len(), "Redo history invalidated");
            self.future.clear();
        }
        Ok(())
    }

    /// Steps back to the previous snapshot and returns it.
    ///
    /// Returns `Ok(None)` without touching anything if there is nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] if `initialize` was never
    /// called.
    pub fn undo(&mut self) -> Result<Option<Arc<S>>, HistoryError> {
        self.ensure_initialized("undo")?;
        let Some(prev) = self.past.pop_back() else {
            return Ok(None);
        };
        if let Some(current) = self.present.replace(Arc::clone(&prev)) {
            self.future.push(current);
        }
        tracing::trace!(
            undo_count = self.past.len(),
            redo_count = self.future.len(),
            "Undo"
        );
        Ok(Some(prev))
    }

    /// Reapplies the most recently undone snapshot and returns it.
    ///
    /// Returns `Ok(None)` without touching anything if there is nothing to
    /// redo. The present moves onto the undo stack under the same eviction
    /// rule as [`push`](Self::push).
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] if `initialize` was never
    /// called.
    pub fn redo(&mut self) -> Result<Option<Arc<S>>, HistoryError> {
        self.ensure_initialized("redo")?;
        let Some(next) = self.future.pop() else {
            return Ok(None);
        };
        if let Some(current) = self.present.replace(Arc::clone(&next)) {
            self.push_past(current);
        }
        tracing::trace!(
            undo_count = self.past.len(),
            redo_count = self.future.len(),
            "Redo"
        );
        Ok(Some(next))
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] if `initialize` was never
    /// called.
    pub fn present(&self) -> Result<&Arc<S>, HistoryError> {
        self.present
            .as_ref()
            .ok_or(HistoryError::Uninitialized { operation: "present" })
    }

    /// Whether `initialize` has been called.
    pub fn is_initialized(&self) -> bool {
        self.present.is_some()
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of snapshots on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    /// Number of snapshots on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Max entries retained on the undo stack.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Iterates the undo stack, oldest first.
    pub fn past(&self) -> impl DoubleEndedIterator<Item = &Arc<S>> + '_ {
        self.past.iter()
    }

    /// Iterates the redo stack from the bottom; the last item is the next
    /// snapshot `redo` would return.
    pub fn future(&self) -> impl DoubleEndedIterator<Item = &Arc<S>> + '_ {
        self.future.iter()
    }

    fn ensure_initialized(&self, operation: &'static str) -> Result<(), HistoryError> {
        if self.present.is_none() {
            return Err(HistoryError::Uninitialized { operation });
        }
        Ok(())
    }

    /// Appends to the undo stack, evicting from the front first so the
    /// stack never exceeds capacity.
    fn push_past(&mut self, snapshot: Arc<S>) {
        while self.past.len() >= self.capacity.get() {
            self.past.pop_front();
            tracing::debug!(capacity = self.capacity.get(), "Evicted oldest undo entry");
        }
        self.past.push_back(snapshot);
    }
}
