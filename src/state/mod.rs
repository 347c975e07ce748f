//! State management module
//!
//! This module contains the preset and timer state types and the process-wide
//! application state that owns them.

pub mod app_state;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Outcome};
pub use snapshot::{keys, Preset, PresetFamily, PresetSnapshot};
pub use timer_state::{format_time, Tick, TimerPhase, TimerState, DEFAULT_DURATION_SECONDS};
