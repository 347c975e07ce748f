//! Message protocol between the daemon and the editor's UI pane

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Messages the UI pane sends to the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum InboundMessage {
    StartTimer,
    PauseTimer,
    ResetTimer,
    Toggle,
    HcDark,
    HcLight,
    RestoreTheme,
    DyslexiaOn,
    DyslexiaOff,
    /// Model-backed commands handled by the editor host, not by this daemon
    AnalyzeCode,
    BreakdownTask,
}

impl InboundMessage {
    pub fn command(self) -> &'static str {
        match self {
            InboundMessage::StartTimer => "startTimer",
            InboundMessage::PauseTimer => "pauseTimer",
            InboundMessage::ResetTimer => "resetTimer",
            InboundMessage::Toggle => "toggle",
            InboundMessage::HcDark => "hcDark",
            InboundMessage::HcLight => "hcLight",
            InboundMessage::RestoreTheme => "restoreTheme",
            InboundMessage::DyslexiaOn => "dyslexiaOn",
            InboundMessage::DyslexiaOff => "dyslexiaOff",
            InboundMessage::AnalyzeCode => "analyzeCode",
            InboundMessage::BreakdownTask => "breakdownTask",
        }
    }
}

/// Messages the daemon publishes to the UI pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum OutboundMessage {
    UpdateTime { time: String },
}

/// One-way outbound channel to the UI pane
#[derive(Debug, Clone)]
pub struct UiChannel {
    tx: broadcast::Sender<OutboundMessage>,
}

impl UiChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutboundMessage> {
        self.tx.subscribe()
    }

    pub fn post_message(&self, message: OutboundMessage) {
        debug!("ui <- {:?}", message);
        // The pane may be closed; dropping the update is expected then
        let _ = self.tx.send(message);
    }
}

impl Default for UiChannel {
    fn default() -> Self {
        Self::new(256)
    }
}
