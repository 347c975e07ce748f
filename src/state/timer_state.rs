//! Focus timer state machine

use serde::{Deserialize, Serialize};

/// Default focus session length (25 minutes)
pub const DEFAULT_DURATION_SECONDS: u64 = 25 * 60;

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Counter decremented, still running
    Counted(u64),
    /// Counter reached zero on this tick
    Expired,
    /// Timer was not running; nothing happened
    Ignored,
}

/// Countdown state. Holds no tick source; `CountdownTimer` owns that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub phase: TimerPhase,
    #[serde(skip)]
    duration_seconds: u64,
}

impl TimerState {
    /// Create an idle timer with the default duration
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_SECONDS)
    }

    pub fn with_duration(duration_seconds: u64) -> Self {
        Self {
            remaining_seconds: duration_seconds,
            phase: TimerPhase::Idle,
            duration_seconds,
        }
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Move to Running. Returns false when the timer cannot start
    /// (already running, or expired and awaiting reset).
    pub fn start(&mut self) -> bool {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                true
            }
            TimerPhase::Running | TimerPhase::Expired => false,
        }
    }

    /// Move Running to Paused. Returns false from any other phase.
    pub fn pause(&mut self) -> bool {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
            true
        } else {
            false
        }
    }

    /// Return to the initial idle state from any phase
    pub fn reset(&mut self) {
        self.remaining_seconds = self.duration_seconds;
        self.phase = TimerPhase::Idle;
    }

    /// Consume one elapsed second
    pub fn tick(&mut self) -> Tick {
        if self.phase != TimerPhase::Running {
            return Tick::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Expired;
            Tick::Expired
        } else {
            Tick::Counted(self.remaining_seconds)
        }
    }

    pub fn display(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
