//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{Preset, PresetFamily, TimerState};
use crate::{
    services::{toggle_minimalist, InboundMessage, Notifier, SettingsPresetManager, UiChannel},
    store::{DurableStore, SettingsStore, StoreError},
    tasks::CountdownTimer,
};

/// Result of dispatching one inbound UI message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation changed something
    Done(String),
    /// The operation was a defined no-op
    Unchanged(String),
    /// The operation failed; the user was already notified
    Failed(String),
    /// The command belongs to the editor host, not this daemon
    Unsupported(String),
}

/// Process-lifetime state owning the preset manager, the focus timer, and
/// the channels they report through
pub struct AppState {
    pub settings: Arc<dyn SettingsStore>,
    pub presets: SettingsPresetManager,
    pub timer: CountdownTimer,
    pub notifier: Notifier,
    pub ui: UiChannel,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the application state, reloading any live preset snapshots
    pub fn new(
        port: u16,
        host: String,
        timer_duration_seconds: u64,
        settings: Arc<dyn SettingsStore>,
        durable: Arc<dyn DurableStore>,
    ) -> Result<Self, StoreError> {
        let notifier = Notifier::default();
        let ui = UiChannel::default();
        let presets = SettingsPresetManager::new(Arc::clone(&settings), durable, notifier.clone())?;
        let timer = CountdownTimer::new(timer_duration_seconds, ui.clone(), notifier.clone());

        Ok(Self {
            settings,
            presets,
            timer,
            notifier,
            ui,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        })
    }

    /// Run the operation named by an inbound UI message
    pub fn handle_message(&self, message: InboundMessage) -> Outcome {
        info!("Handling UI command: {}", message.command());
        self.record_action(message.command());

        match message {
            InboundMessage::StartTimer => {
                if self.timer.start() {
                    Outcome::Done("Focus timer started".to_string())
                } else {
                    Outcome::Unchanged("Focus timer not started".to_string())
                }
            }
            InboundMessage::PauseTimer => {
                if self.timer.pause() {
                    Outcome::Done("Focus timer paused".to_string())
                } else {
                    Outcome::Unchanged("Focus timer was not running".to_string())
                }
            }
            InboundMessage::ResetTimer => {
                self.timer.reset();
                Outcome::Done("Focus timer reset".to_string())
            }
            InboundMessage::Toggle => match toggle_minimalist(&*self.settings, &self.notifier) {
                Ok(minimap) => Outcome::Done(format!(
                    "Minimalist mode toggled (minimap {})",
                    if minimap { "shown" } else { "hidden" }
                )),
                Err(e) => Outcome::Failed(e.to_string()),
            },
            InboundMessage::HcDark => self.apply(Preset::HighContrastDark),
            InboundMessage::HcLight => self.apply(Preset::HighContrastLight),
            InboundMessage::DyslexiaOn => self.apply(Preset::DyslexiaFriendly),
            InboundMessage::RestoreTheme => self.restore(PresetFamily::Theme),
            InboundMessage::DyslexiaOff => self.restore(PresetFamily::Typography),
            InboundMessage::AnalyzeCode | InboundMessage::BreakdownTask => {
                warn!("Command {} is handled by the editor host", message.command());
                Outcome::Unsupported(format!("'{}' is not supported", message.command()))
            }
        }
    }

    fn apply(&self, preset: Preset) -> Outcome {
        match self.presets.apply_preset(preset) {
            Ok(()) => Outcome::Done(format!("{} applied", preset.label())),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    fn restore(&self, family: PresetFamily) -> Outcome {
        match self.presets.restore_preset(family) {
            Ok(true) => Outcome::Done(format!("{} restored", family)),
            Ok(false) => Outcome::Unchanged(format!("No saved {} to restore", family)),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Tear down background work before the process exits
    pub fn shutdown(&self) {
        self.timer.shutdown();
        info!("Application state shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::keys, store::MemoryStore};
    use serde_json::json;

    fn app() -> (AppState, Arc<MemoryStore>) {
        let settings = Arc::new(MemoryStore::with_values([(keys::COLOR_THEME, json!("Monokai"))]));
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            1500,
            settings.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();
        (state, settings)
    }

    #[test]
    fn theme_commands_apply_and_restore() {
        let (app, settings) = app();

        assert!(matches!(app.handle_message(InboundMessage::HcLight), Outcome::Done(_)));
        assert_eq!(
            SettingsStore::get(&*settings, keys::COLOR_THEME).unwrap(),
            Some(json!("Default High Contrast Light"))
        );

        assert!(matches!(app.handle_message(InboundMessage::RestoreTheme), Outcome::Done(_)));
        assert_eq!(
            SettingsStore::get(&*settings, keys::COLOR_THEME).unwrap(),
            Some(json!("Monokai"))
        );
        assert!(matches!(
            app.handle_message(InboundMessage::RestoreTheme),
            Outcome::Unchanged(_)
        ));
    }

    #[test]
    fn model_commands_are_unsupported() {
        let (app, _) = app();
        assert!(matches!(
            app.handle_message(InboundMessage::AnalyzeCode),
            Outcome::Unsupported(_)
        ));
    }

    #[test]
    fn records_last_action() {
        let (app, _) = app();
        app.handle_message(InboundMessage::DyslexiaOn);
        let (action, time) = app.get_last_action();
        assert_eq!(action.as_deref(), Some("dyslexiaOn"));
        assert!(time.is_some());
    }

    #[tokio::test]
    async fn timer_commands_drive_the_timer() {
        let (app, _) = app();
        assert!(matches!(app.handle_message(InboundMessage::StartTimer), Outcome::Done(_)));
        assert!(matches!(
            app.handle_message(InboundMessage::StartTimer),
            Outcome::Unchanged(_)
        ));
        assert!(matches!(app.handle_message(InboundMessage::PauseTimer), Outcome::Done(_)));
        assert!(!app.timer.has_tick_source());
        app.handle_message(InboundMessage::ResetTimer);
        assert_eq!(app.get_timer_state().remaining_seconds, 1500);
    }
}
