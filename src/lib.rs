//! Accessibly - accessibility display presets and a focus timer for your editor
//!
//! This library applies display presets (high contrast themes, dyslexia-friendly
//! typography) to an editor settings store with snapshot/restore, and runs a
//! focus countdown timer that reports to the editor's UI pane.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
