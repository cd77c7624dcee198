/// Thread-safe handle to a single document's history.
///
/// `HistoryManager` assumes one owner. When several actors (an editor view
/// and a background auto-save task, say) need the same history, they share a
/// `SharedHistory`: one mutex per document, so every `push`/`undo`/`redo` is
/// linearizable.
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::HistoryError;
use crate::manager::HistoryManager;

/// Cloneable, lock-protected [`HistoryManager`].
pub struct SharedHistory<S: ?Sized> {
    inner: Arc<Mutex<HistoryManager<S>>>,
}

impl<S: ?Sized> Clone for SharedHistory<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for SharedHistory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedHistory").field(&*self.inner.lock()).finish()
    }
}

impl<S: ?Sized> From<HistoryManager<S>> for SharedHistory<S> {
    fn from(manager: HistoryManager<S>) -> Self {
        Self::new(manager)
    }
}

impl<S: ?Sized> SharedHistory<S> {
    /// Wraps `manager` for shared use.
    pub fn new(manager: HistoryManager<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// See [`HistoryManager::initialize`].
    pub fn initialize(&self, snapshot: impl Into<Arc<S>>) {
        self.inner.lock().initialize(snapshot);
    }

    /// See [`HistoryManager::push`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] before the first `initialize`.
    pub fn push(&self, snapshot: impl Into<Arc<S>>) -> Result<(), HistoryError> {
        self.inner.lock().push(snapshot)
    }

    /// See [`HistoryManager::undo`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] before the first `initialize`.
    pub fn undo(&self) -> Result<Option<Arc<S>>, HistoryError> {
        self.inner.lock().undo()
    }

    /// See [`HistoryManager::redo`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] before the first `initialize`.
    pub fn redo(&self) -> Result<Option<Arc<S>>, HistoryError> {
        self.inner.lock().redo()
    }

    /// Returns a handle to the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Uninitialized`] before the first `initialize`.
    pub fn present(&self) -> Result<Arc<S>, HistoryError> {
        self.inner.lock().present().map(Arc::clone)
    }

    pub fn can_undo(&self) -> bool {
        self.inner.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.lock().can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.inner.lock().undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.inner.lock().redo_count()
    }

    /// Runs `f` with exclusive access to the manager.
    ///
    /// Use this for compound sequences (check-then-act) that must not
    /// interleave with other actors.
    pub fn with<R>(&self, f: impl FnOnce(&mut HistoryManager<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
