//! Run session lifecycle
//!
//! A session owns the tracking engine and the two logical subscriptions
//! that feed it: the 1 Hz tick and the position watch. Both are held only
//! while the session is running and unpaused; pausing releases them
//! outright (time does not accumulate while paused) and resuming acquires
//! fresh ones. Stopping freezes the accumulated state into a `RunSummary`.
//!
//! Everything runs on one logical thread: events are delivered one at a
//! time through `handle`, and the engine state is owned exclusively here.

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::models::{PositionSample, RunState, RunSummary};
use crate::tracker::{RunTracker, TrackerConfig};

/// One event delivered to a running session
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// One elapsed second from the tick subscription
    Tick,
    /// A fix from the position subscription
    Fix(PositionSample),
    /// Transport failure from the position source; never fatal
    SourceError(String),
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Paused,
    Stopped,
}

/// A run in progress
pub struct RunSession {
    tracker: Option<RunTracker>,
    phase: SessionPhase,
}

impl RunSession {
    /// Start a run at `start_ms` wall-clock milliseconds; the session
    /// enters the running phase with both subscriptions live
    pub fn start(config: TrackerConfig, start_ms: i64) -> Self {
        Self {
            tracker: Some(RunTracker::new(config, start_ms)),
            phase: SessionPhase::Running,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current engine state, while the run has not been stopped
    pub fn state(&self) -> Option<&RunState> {
        self.tracker.as_ref().map(|t| t.state())
    }

    /// Release both subscriptions and freeze time
    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Paused;
        }
    }

    /// Re-acquire both subscriptions from scratch
    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Running;
        }
    }

    /// Dispatch one event to the engine
    ///
    /// While paused or stopped the subscriptions are gone, so nothing
    /// should arrive here; anything that does is dropped so a straggling
    /// callback cannot advance the clock or the distance counter.
    pub fn handle(&mut self, event: RunEvent) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };

        match event {
            RunEvent::Tick => tracker.on_tick(),
            RunEvent::Fix(sample) => {
                tracker.on_sample(sample);
            }
            RunEvent::SourceError(reason) => {
                warn!(%reason, "position source error, tracking continues");
            }
        }
    }

    /// Stop the run and freeze the summary. Returns `None` if the session
    /// was already stopped.
    pub fn stop(&mut self, date: NaiveDate) -> Option<RunSummary> {
        let tracker = self.tracker.take()?;
        self.phase = SessionPhase::Stopped;

        let (state, track) = tracker.finish();
        Some(RunSummary {
            id: Uuid::new_v4(),
            date,
            distance_km: state.distance_km,
            duration_seconds: state.elapsed_seconds,
            avg_pace_min_per_km: state.avg_pace_min_per_km,
            max_speed_kmh: state.max_speed_kmh,
            track,
        })
    }
}

/// Merge a recorded sample sequence with synthesized 1 Hz ticks into the
/// event stream a live run would produce
///
/// Ticks land at whole seconds after the first sample's timestamp; a fix
/// sharing an instant with a tick is delivered first, matching a position
/// callback firing ahead of the timer.
pub fn replay_timeline(samples: &[PositionSample]) -> Vec<RunEvent> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    let last = samples.last().unwrap();

    let start_ms = first.timestamp_ms;
    let total_ticks = (last.timestamp_ms - start_ms) / 1_000;

    let mut events = Vec::with_capacity(samples.len() + total_ticks as usize);
    let mut next_sample = samples.iter();
    let mut pending = next_sample.next();

    for tick in 1..=total_ticks {
        let tick_ms = start_ms + tick * 1_000;
        while let Some(sample) = pending {
            if sample.timestamp_ms <= tick_ms {
                events.push(RunEvent::Fix(*sample));
                pending = next_sample.next();
            } else {
                break;
            }
        }
        events.push(RunEvent::Tick);
    }
    while let Some(sample) = pending {
        events.push(RunEvent::Fix(*sample));
        pending = next_sample.next();
    }

    events
}
