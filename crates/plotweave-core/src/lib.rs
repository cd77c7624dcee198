//! Per-document glue between the editing surfaces and the history engine.

pub mod document;
pub mod documents;
pub mod history;

pub use document::Document;
pub use documents::DocumentSet;
