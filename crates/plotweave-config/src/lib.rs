pub mod config;
pub mod surface;

pub use config::{AppConfig, DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
pub use surface::EditSurface;
