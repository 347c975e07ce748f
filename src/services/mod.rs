//! Services acting on the editor's settings and the UI pane
//!
//! This module contains the preset manager, the minimalist toggle, and the
//! notification and UI channels they report through.

pub mod minimalist;
pub mod notifier;
pub mod presets;
pub mod ui_channel;

// Re-export main types
pub use minimalist::toggle_minimalist;
pub use notifier::{Level, Notification, Notifier};
pub use presets::{PresetError, SettingsPresetManager};
pub use ui_channel::{InboundMessage, OutboundMessage, UiChannel};
