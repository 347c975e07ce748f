//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{format_time, TimerPhase, TimerState};

/// Countdown summary embedded in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatus {
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    pub time: String,
}

impl From<&TimerState> for TimerStatus {
    fn from(state: &TimerState) -> Self {
        Self {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            time: format_time(state.remaining_seconds),
        }
    }
}

/// API response structure for UI message dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: &TimerState) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    pub fn ok(message: String, timer: &TimerState) -> Self {
        Self::new("ok", message, timer)
    }

    pub fn unchanged(message: String, timer: &TimerState) -> Self {
        Self::new("unchanged", message, timer)
    }

    pub fn error(message: String, timer: &TimerState) -> Self {
        Self::new("error", message, timer)
    }

    pub fn unsupported(message: String, timer: &TimerState) -> Self {
        Self::new("unsupported", message, timer)
    }
}

/// Which preset families currently hold a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub theme: bool,
    pub typography: bool,
}

/// Status response with timer and preset information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerStatus,
    pub snapshots: SnapshotStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
