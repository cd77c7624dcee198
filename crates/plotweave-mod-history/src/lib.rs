/// Bounded undo/redo history over immutable snapshots.
///
/// Provides a `HistoryManager` that keeps one linear history per document:
/// a capped stack of past snapshots, the present snapshot, and a stack of
/// undone snapshots that a new edit discards. Snapshots are shared as
/// `Arc` handles and never copied or inspected.
pub mod config;
pub mod error;
pub mod manager;
pub mod shared;

pub use config::HistoryConfig;
pub use error::HistoryError;
pub use manager::HistoryManager;
pub use shared::SharedHistory;
