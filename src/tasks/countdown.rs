//! Focus countdown timer with an owned one-second tick source

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, error, info};

use crate::{
    services::{Notifier, OutboundMessage, UiChannel},
    state::{Tick, TimerState},
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Inner {
    state: TimerState,
    /// Present iff `state.phase` is Running
    tick_source: Option<JoinHandle<()>>,
    /// Bumped on every start; ticks from older sources are discarded
    generation: u64,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    ui: UiChannel,
    notifier: Notifier,
}

/// Single countdown instance driven by start/pause/reset.
///
/// Cloning yields another handle to the same timer.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    shared: Arc<Shared>,
}

impl CountdownTimer {
    pub fn new(duration_seconds: u64, ui: UiChannel, notifier: Notifier) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: TimerState::with_duration(duration_seconds),
                    tick_source: None,
                    generation: 0,
                }),
                ui,
                notifier,
            }),
        }
    }

    /// Snapshot of the countdown state
    pub fn state(&self) -> TimerState {
        match self.shared.inner.lock() {
            Ok(inner) => inner.state.clone(),
            Err(poisoned) => poisoned.into_inner().state.clone(),
        }
    }

    /// Start or resume counting down. Must be called from within a tokio runtime.
    ///
    /// Returns false, without touching the tick source, when the timer is
    /// already running or has expired.
    pub fn start(&self) -> bool {
        let Ok(mut inner) = self.shared.inner.lock() else {
            error!("Timer state lock poisoned, ignoring start");
            return false;
        };

        if inner.tick_source.is_some() {
            debug!("Timer already running");
            return false;
        }
        if !inner.state.start() {
            debug!("Timer cannot start from {:?}", inner.state.phase);
            return false;
        }

        inner.generation += 1;
        let generation = inner.generation;
        let shared = Arc::clone(&self.shared);
        inner.tick_source = Some(tokio::spawn(run_tick_source(shared, generation)));

        info!(
            "Focus timer started at {} (generation {})",
            inner.state.display(),
            generation
        );
        true
    }

    /// Stop counting and keep the remaining time. No-op unless running.
    pub fn pause(&self) -> bool {
        let Ok(mut inner) = self.shared.inner.lock() else {
            error!("Timer state lock poisoned, ignoring pause");
            return false;
        };

        if !inner.state.pause() {
            return false;
        }
        cancel(&mut inner);
        info!("Focus timer paused at {}", inner.state.display());
        true
    }

    /// Return to the full duration from any phase and publish the display
    /// value immediately.
    pub fn reset(&self) {
        let mut inner = match self.shared.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };

        cancel(&mut inner);
        inner.state.reset();
        self.shared.ui.post_message(OutboundMessage::UpdateTime {
            time: inner.state.display(),
        });
        info!("Focus timer reset to {}", inner.state.display());
    }

    /// Cancel the tick source on process shutdown
    pub fn shutdown(&self) {
        let mut inner = match self.shared.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        if inner.state.pause() {
            cancel(&mut inner);
            debug!("Tick source cancelled for shutdown");
        }
    }

    /// Whether a tick source is currently registered
    pub fn has_tick_source(&self) -> bool {
        self.shared
            .inner
            .lock()
            .map(|inner| inner.tick_source.is_some())
            .unwrap_or(false)
    }
}

impl Shared {
    /// Apply one tick from source `generation`. Returns whether the source
    /// should keep running.
    fn tick(&self, generation: u64) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        if inner.generation != generation || inner.tick_source.is_none() {
            debug!("Discarding stale tick from generation {}", generation);
            return false;
        }

        match inner.state.tick() {
            Tick::Counted(remaining) => {
                self.ui.post_message(OutboundMessage::UpdateTime {
                    time: inner.state.display(),
                });
                debug!("Focus timer tick: {}s remaining", remaining);
                true
            }
            Tick::Expired => {
                // The source is this very task and exits on return
                inner.tick_source = None;
                self.ui.post_message(OutboundMessage::UpdateTime {
                    time: inner.state.display(),
                });
                drop(inner);
                self.notifier.info("Focus session complete!");
                false
            }
            Tick::Ignored => false,
        }
    }
}

/// Abort the registered tick source and invalidate any tick already in flight
fn cancel(inner: &mut Inner) {
    if let Some(handle) = inner.tick_source.take() {
        handle.abort();
    }
    inner.generation += 1;
}

async fn run_tick_source(shared: Arc<Shared>, generation: u64) {
    let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        interval.tick().await;
        if !shared.tick(generation) {
            break;
        }
    }
}
