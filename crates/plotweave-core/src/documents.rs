/// Registry of open documents, one history per document.
use std::sync::Arc;

use anyhow::Result;
use plotweave_config::{AppConfig, EditSurface};

use crate::document::Document;
use crate::history::HistoryConfig;

/// Manages the open documents of an editing session.
///
/// Each document owns its own `HistoryManager`; closing a document drops
/// its history with it.
#[derive(Debug)]
pub struct DocumentSet<S: ?Sized> {
    /// All open documents, in opening order.
    documents: Vec<Document<S>>,
    /// Index of the active document, if any is open.
    active: Option<usize>,
    /// Source of per-surface history capacities.
    config: AppConfig,
}

impl<S: ?Sized> DocumentSet<S> {
    /// Creates an empty set using `config` for history capacities.
    pub fn new(config: AppConfig) -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            config,
        }
    }

    /// Opens a document and makes it active.
    ///
    /// If a document with the same id is already open, it is activated
    /// and returned unchanged; `initial` is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured capacity for `surface` is zero.
    pub fn open(
        &mut self,
        id: &str,
        title: &str,
        surface: EditSurface,
        initial: impl Into<Arc<S>>,
    ) -> Result<&mut Document<S>> {
        let idx = match self.position(id) {
            Some(idx) => idx,
            None => {
                let config = HistoryConfig::for_surface(&self.config, surface);
                let doc = Document::open(id, title, surface, initial, &config)?;
                self.documents.push(doc);
                self.documents.len() - 1
            }
        };
        self.active = Some(idx);
        Ok(&mut self.documents[idx])
    }

    /// Closes a document, dropping it and its history.
    ///
    /// Returns the closed document, or `None` if `id` is not open. The
    /// caller should check for unsaved changes before calling this.
    pub fn close(&mut self, id: &str) -> Option<Document<S>> {
        let idx = self.position(id)?;
        let doc = self.documents.remove(idx);
        self.active = match self.active {
            _ if self.documents.is_empty() => None,
            Some(active) if active > idx => Some(active - 1),
            Some(active) if active >= self.documents.len() => Some(self.documents.len() - 1),
            other => other,
        };
        tracing::debug!(doc_id = %doc.id, "Closed document");
        Some(doc)
    }

    /// Activates the document with `id`. Returns false if it is not open.
    pub fn set_active(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.active = Some(idx);
                true
            }
            None => false,
        }
    }

    /// Returns the active document.
    pub fn active(&self) -> Option<&Document<S>> {
        self.active.map(|idx| &self.documents[idx])
    }

    /// Returns the active document mutably.
    pub fn active_mut(&mut self) -> Option<&mut Document<S>> {
        self.active.map(|idx| &mut self.documents[idx])
    }

    pub fn get(&self, id: &str) -> Option<&Document<S>> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Document<S>> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Ids of all open documents, in opening order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents.iter().map(|d| d.id.as_str())
    }

    /// Ids of documents with unsaved changes.
    pub fn modified_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents
            .iter()
            .filter(|d| d.is_modified())
            .map(|d| d.id.as_str())
    }

    /// Returns the number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> DocumentSet<str> {
        let mut config = AppConfig::default();
        config.surface_capacities.insert(EditSurface::Settings, 2);
        DocumentSet::new(config)
    }

    #[test]
    fn test_new_set_is_empty() {
        let docs = set();
        assert!(docs.is_empty());
        assert!(docs.active().is_none());
    }

    #[test]
    fn test_open_activates_document() {
        let mut docs = set();
        docs.open("a", "A", EditSurface::NodeGraph, "a0").unwrap();
        docs.open("b", "B", EditSurface::BlockTree, "b0").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.active().unwrap().id, "b");
    }

    #[test]
    fn test_open_existing_reactivates_without_reset() {
        let mut docs = set();
        docs.open("a", "A", EditSurface::NodeGraph, "a0")
            .unwrap()
            .commit("a1")
            .unwrap();
        docs.open("b", "B", EditSurface::NodeGraph, "b0").unwrap();

        let doc = docs.open("a", "A", EditSurface::NodeGraph, "ignored").unwrap();
        assert_eq!(&**doc.current().unwrap(), "a1");
        assert!(doc.can_undo());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.active().unwrap().id, "a");
    }

    #[test]
    fn test_surface_capacity_applied() {
        let mut docs = set();
        let doc = docs.open("s", "Settings", EditSurface::Settings, "s0").unwrap();
        assert_eq!(doc.history().capacity(), 2);
        let doc = docs.open("g", "Graph", EditSurface::NodeGraph, "g0").unwrap();
        assert_eq!(doc.history().capacity(), 100);
    }

    #[test]
    fn test_close_adjusts_active() {
        let mut docs = set();
        for id in ["a", "b", "c"] {
            docs.open(id, id, EditSurface::BlockTree, id).unwrap();
        }
        // Active is "c" (last); closing it falls back to the new last
        docs.close("c").unwrap();
        assert_eq!(docs.active().unwrap().id, "b");

        // Closing a document before the active one keeps the same active doc
        docs.close("a").unwrap();
        assert_eq!(docs.active().unwrap().id, "b");

        docs.close("b").unwrap();
        assert!(docs.active().is_none());
        assert!(docs.is_empty());
    }

    #[test]
    fn test_close_unknown_returns_none() {
        let mut docs = set();
        assert!(docs.close("missing").is_none());
    }

    #[test]
    fn test_close_drops_history() {
        let mut docs: DocumentSet<String> = DocumentSet::new(AppConfig::default());
        let snapshot = Arc::new(String::from("kept by caller"));
        docs.open("a", "A", EditSurface::NodeGraph, Arc::clone(&snapshot))
            .unwrap();
        assert!(Arc::strong_count(&snapshot) > 1);

        drop(docs.close("a"));
        assert_eq!(Arc::strong_count(&snapshot), 1);
    }

    #[test]
    fn test_set_active_and_modified_ids() {
        let mut docs = set();
        docs.open("a", "A", EditSurface::NodeGraph, "a0").unwrap();
        docs.open("b", "B", EditSurface::NodeGraph, "b0").unwrap();

        assert!(docs.set_active("a"));
        assert!(!docs.set_active("zzz"));
        docs.active_mut().unwrap().commit("a1").unwrap();

        let modified: Vec<&str> = docs.modified_ids().collect();
        assert_eq!(modified, vec!["a"]);
        let ids: Vec<&str> = docs.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(docs.get("b").is_some());
        assert!(docs.get_mut("a").unwrap().can_undo());
    }
}
