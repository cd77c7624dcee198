//! Document model tying an editable snapshot to its undo/redo history.
//!
//! A `Document` is what an editing surface (node graph, block tree,
//! settings) works against: it commits each finished edit as a new
//! snapshot, asks for the previous or next snapshot on undo/redo, and
//! tracks whether the present differs from what was last saved.

use std::sync::Arc;

use anyhow::{Context, Result};
use plotweave_config::EditSurface;

use crate::history::{HistoryConfig, HistoryManager};

/// A single open document with its history and metadata.
pub struct Document<S: ?Sized> {
    /// Stable document identifier (see [`crate::history::doc_id_for_path`]).
    pub id: String,
    /// Title shown in the editor.
    pub title: String,
    /// Surface this document is edited through.
    pub surface: EditSurface,
    history: HistoryManager<S>,
    /// Snapshot that matches the file on disk, if any.
    saved: Option<Arc<S>>,
    /// Incremented whenever the present snapshot changes.
    content_version: u64,
}

impl<S: ?Sized> std::fmt::Debug for Document<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("surface", &self.surface)
            .field("history", &self.history)
            .field("modified", &self.is_modified())
            .field("content_version", &self.content_version)
            .finish()
    }
}

impl<S: ?Sized> Document<S> {
    /// Opens a document whose history starts at `initial`.
    ///
    /// The initial snapshot counts as saved.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` has a zero capacity.
    pub fn open(
        id: impl Into<String>,
        title: impl Into<String>,
        surface: EditSurface,
        initial: impl Into<Arc<S>>,
        config: &HistoryConfig,
    ) -> Result<Self> {
        let id = id.into();
        let mut history = HistoryManager::from_config(config)
            .with_context(|| format!("Invalid history configuration for document {id}"))?;
        let initial = initial.into();
        history.initialize(Arc::clone(&initial));
        tracing::debug!(doc_id = %id, %surface, capacity = config.capacity, "Opened document");
        Ok(Self {
            id,
            title: title.into(),
            surface,
            history,
            saved: Some(initial),
            content_version: 0,
        })
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Only fails if the history was never initialized, which `open`
    /// rules out.
    pub fn current(&self) -> Result<&Arc<S>> {
        self.history
            .present()
            .with_context(|| format!("Document {} has no present snapshot", self.id))
    }

    /// Commits a finished edit as the new present snapshot.
    ///
    /// # Errors
    ///
    /// Propagates history errors (not expected for an opened document).
    pub fn commit(&mut self, snapshot: impl Into<Arc<S>>) -> Result<()> {
        self.history
            .push(snapshot)
            .with_context(|| format!("Failed to commit edit to document {}", self.id))?;
        self.bump_version();
        Ok(())
    }

    /// Performs undo and returns the snapshot the surface should render.
    ///
    /// Returns `Ok(None)` if there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Propagates history errors (not expected for an opened document).
    pub fn undo(&mut self) -> Result<Option<Arc<S>>> {
        let prev = self
            .history
            .undo()
            .with_context(|| format!("Failed to undo in document {}", self.id))?;
        if prev.is_some() {
            self.bump_version();
        }
        Ok(prev)
    }

    /// Performs redo and returns the snapshot the surface should render.
    ///
    /// Returns `Ok(None)` if there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Propagates history errors (not expected for an opened document).
    pub fn redo(&mut self) -> Result<Option<Arc<S>>> {
        let next = self
            .history
            .redo()
            .with_context(|| format!("Failed to redo in document {}", self.id))?;
        if next.is_some() {
            self.bump_version();
        }
        Ok(next)
    }

    /// Replaces the document content (e.g. after reloading the file from
    /// disk). History is reset and the new snapshot counts as saved.
    pub fn reload(&mut self, snapshot: impl Into<Arc<S>>) {
        let snapshot = snapshot.into();
        self.history.initialize(Arc::clone(&snapshot));
        self.saved = Some(snapshot);
        self.bump_version();
    }

    /// Records the present snapshot as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved = self.history.present().ok().map(Arc::clone);
    }

    /// Whether the present snapshot differs from the saved one.
    ///
    /// Compares handles, not contents: undoing back to the saved snapshot
    /// clears the flag, re-committing an equal value does not.
    pub fn is_modified(&self) -> bool {
        match (self.history.present().ok(), &self.saved) {
            (Some(present), Some(saved)) => !Arc::ptr_eq(present, saved),
            (None, None) => false,
            _ => true,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    /// Read-only access to the underlying history.
    pub fn history(&self) -> &HistoryManager<S> {
        &self.history
    }

    /// Monotonic counter that changes whenever the present snapshot does.
    ///
    /// Lets render caches detect changes without comparing snapshots.
    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    #[inline]
    fn bump_version(&mut self) {
        self.content_version = self.content_version.wrapping_add(1);
    }
}
