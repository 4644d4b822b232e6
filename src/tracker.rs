//! Run-tracking computation engine
//!
//! Converts a stream of raw GPS samples plus a 1 Hz time tick into live run
//! metrics: cumulative distance, average pace, a trailing-window "current"
//! pace, and current/maximum speed. GPS noise is handled in three stages:
//! an accuracy gate on every incoming sample, a minimum wall-clock interval
//! between distance contributions, and an outlier gate on the implied
//! distance delta.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geo::sample_distance_km;
use crate::models::{PositionSample, RunState};

/// Noise-filtering thresholds for the tracking engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Samples with worse horizontal accuracy than this are dropped (meters)
    pub max_accuracy_m: f64,

    /// Minimum wall-clock time between distance contributions (milliseconds)
    pub min_delta_interval_ms: i64,

    /// Distance deltas at or above this are rejected as GPS glitches (kilometers)
    pub max_delta_km: f64,

    /// Trailing window for the current-pace estimate (milliseconds)
    pub pace_window_ms: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: 50.0,
            min_delta_interval_ms: 2_000,
            max_delta_km: 0.1,
            pace_window_ms: 30_000,
        }
    }
}

/// What `on_sample` did with an incoming sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Accuracy above the gate; nothing changed
    RejectedAccuracy,
    /// Appended to the track without a distance contribution
    Recorded,
    /// Appended to the track and accepted into the distance counter
    DistanceAdded(f64),
}

/// Incremental run metrics engine
///
/// Owns the `RunState` exclusively; the only mutation entry points are
/// `on_tick` and `on_sample`, both delivered on a single logical thread.
pub struct RunTracker {
    config: TrackerConfig,
    state: RunState,
    track: Vec<PositionSample>,
}

impl RunTracker {
    /// Create a tracker at run start. `start_ms` is the wall clock at start
    /// and seeds the distance-contribution throttle.
    pub fn new(config: TrackerConfig, start_ms: i64) -> Self {
        Self {
            config,
            state: RunState::at_start(start_ms),
            track: Vec::new(),
        }
    }

    /// Current accumulated state
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// All accuracy-accepted samples so far
    pub fn track(&self) -> &[PositionSample] {
        &self.track
    }

    /// Advance elapsed run time by one second
    ///
    /// Caller contract: never invoked while the run is paused; the session
    /// layer releases the tick subscription entirely on pause.
    pub fn on_tick(&mut self) {
        self.state.elapsed_seconds += 1;
        self.refresh_avg_pace();
    }

    /// Ingest one GPS sample
    ///
    /// Low-accuracy samples are dropped silently: rejection is expected
    /// steady-state behavior under bad reception, not an error.
    pub fn on_sample(&mut self, sample: PositionSample) -> SampleOutcome {
        if sample.accuracy_m > self.config.max_accuracy_m {
            trace!(
                accuracy_m = sample.accuracy_m,
                "sample rejected by accuracy gate"
            );
            return SampleOutcome::RejectedAccuracy;
        }

        self.track.push(sample);
        let mut outcome = SampleOutcome::Recorded;

        if let Some(last) = self.state.last_position {
            let since_update = sample.timestamp_ms - self.state.last_distance_update_ms;
            if since_update >= self.config.min_delta_interval_ms {
                let delta = sample_distance_km(&last, &sample);
                if delta > 0.0 && delta < self.config.max_delta_km {
                    self.state.distance_km += delta;
                    self.state.last_distance_update_ms = sample.timestamp_ms;
                    outcome = SampleOutcome::DistanceAdded(delta);
                } else {
                    trace!(delta_km = delta, "distance delta rejected as outlier");
                }
            }
        }

        // The reference position tracks every accuracy-accepted fix, even
        // when its delta was thrown out; the distance counter only grows on
        // plausible deltas.
        self.state.last_position = Some(sample);

        if let Some(speed) = sample.speed_mps {
            if speed >= 0.0 {
                let speed_kmh = speed * 3.6;
                self.state.current_speed_kmh = speed_kmh;
                self.state.max_speed_kmh = self.state.max_speed_kmh.max(speed_kmh);
            }
        }

        self.refresh_avg_pace();
        self.refresh_current_pace(sample.timestamp_ms);

        outcome
    }

    /// Consume the tracker, yielding the final state and sample track
    pub fn finish(self) -> (RunState, Vec<PositionSample>) {
        (self.state, self.track)
    }

    fn refresh_avg_pace(&mut self) {
        if self.state.elapsed_seconds > 0 && self.state.distance_km > 0.0 {
            let minutes = f64::from(self.state.elapsed_seconds) / 60.0;
            self.state.avg_pace_min_per_km = Some(minutes / self.state.distance_km);
        } else {
            self.state.avg_pace_min_per_km = None;
        }
    }

    /// Recompute the trailing-window pace against `now_ms`
    ///
    /// The window sums raw consecutive deltas with no outlier rejection --
    /// deliberately different from the main accumulation path, so the
    /// responsive estimate follows whatever the receiver actually reported.
    /// A window with fewer than two samples or zero distance leaves the
    /// previous estimate in place.
    fn refresh_current_pace(&mut self, now_ms: i64) {
        if self.state.elapsed_seconds == 0 || self.state.distance_km <= 0.0 {
            return;
        }

        let window_start = self
            .track
            .partition_point(|s| now_ms - s.timestamp_ms >= self.config.pace_window_ms);
        let window = &self.track[window_start..];
        if window.len() < 2 {
            return;
        }

        let mut window_km = 0.0;
        for pair in window.windows(2) {
            window_km += sample_distance_km(&pair[0], &pair[1]);
        }

        let window_minutes =
            (window.last().unwrap().timestamp_ms - window[0].timestamp_ms) as f64 / 60_000.0;

        if window_km > 0.0 && window_minutes > 0.0 {
            self.state.current_pace_min_per_km = Some(window_minutes / window_km);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_at_zero() -> RunTracker {
        RunTracker::new(TrackerConfig::default(), 0)
    }

    fn sample(lat: f64, lon: f64, t_ms: i64) -> PositionSample {
        PositionSample::new(lat, lon, t_ms).with_accuracy(10.0)
    }

    #[test]
    fn test_low_accuracy_sample_rejected() {
        let mut tracker = tracker_at_zero();
        let before = tracker.state().clone();

        let outcome = tracker.on_sample(sample(38.0, -1.0, 1_000).with_accuracy(51.0));

        assert_eq!(outcome, SampleOutcome::RejectedAccuracy);
        assert_eq!(tracker.state(), &before);
        assert!(tracker.track().is_empty());
    }

    #[test]
    fn test_accuracy_at_threshold_accepted() {
        let mut tracker = tracker_at_zero();
        let outcome = tracker.on_sample(sample(38.0, -1.0, 1_000).with_accuracy(50.0));
        assert_eq!(outcome, SampleOutcome::Recorded);
        assert_eq!(tracker.track().len(), 1);
    }

    #[test]
    fn test_first_sample_contributes_no_distance() {
        let mut tracker = tracker_at_zero();
        let outcome = tracker.on_sample(sample(38.0, -1.0, 2_500));
        assert_eq!(outcome, SampleOutcome::Recorded);
        assert_eq!(tracker.state().distance_km, 0.0);
        assert!(tracker.state().last_position.is_some());
    }

    #[test]
    fn test_samples_under_two_seconds_apart_never_contribute() {
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        // Geometrically far but only 1.5 s after the last distance update
        let outcome = tracker.on_sample(sample(38.0005, -1.0, 1_500));
        assert_eq!(outcome, SampleOutcome::Recorded);
        assert_eq!(tracker.state().distance_km, 0.0);
    }

    #[test]
    fn test_same_pair_at_plausible_spacing_contributes() {
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        let outcome = tracker.on_sample(sample(38.0005, -1.0, 2_500));
        assert!(matches!(outcome, SampleOutcome::DistanceAdded(_)));
        assert!(tracker.state().distance_km > 0.05);
    }

    #[test]
    fn test_outlier_jump_rejected() {
        // 0.0015 degrees of latitude is about 0.167 km: over the 0.1 km
        // gate when covered in 2 seconds
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        let outcome = tracker.on_sample(sample(38.0015, -1.0, 2_000));
        assert_eq!(outcome, SampleOutcome::Recorded);
        assert_eq!(tracker.state().distance_km, 0.0);
    }

    #[test]
    fn test_plausible_jump_accepted() {
        // About 0.05 km in 2 seconds
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        let outcome = tracker.on_sample(sample(38.00045, -1.0, 2_000));
        match outcome {
            SampleOutcome::DistanceAdded(delta) => assert!((delta - 0.05).abs() < 0.001),
            other => panic!("expected distance, got {:?}", other),
        }
    }

    #[test]
    fn test_spec_scenario_milli_degree_rejected() {
        // (38.0000,-1.0000,t=0) -> (38.0010,-1.0000,t=3000): about 0.111 km,
        // over the outlier gate, so distance stays zero
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0010, -1.0, 3_000));
        assert_eq!(tracker.state().distance_km, 0.0);
    }

    #[test]
    fn test_spec_scenario_half_milli_degree_accepted() {
        // (38.0000,-1.0000,t=0) -> (38.00005,-1.0000,t=3000): about 0.0556 km
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.00005, -1.0, 3_000));
        let d = tracker.state().distance_km;
        assert!((d - 0.00556).abs() < 0.0005, "got {}", d);
    }

    #[test]
    fn test_implausible_delta_still_advances_reference() {
        // After a rejected glitch jump, the reference position has moved to
        // the glitch fix: a small plausible step from THERE is counted, and
        // the unthrottled update time makes it immediately eligible.
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0020, -1.0, 2_500)); // glitch, rejected
        assert_eq!(tracker.state().distance_km, 0.0);

        let outcome = tracker.on_sample(sample(38.00245, -1.0, 3_000));
        assert!(matches!(outcome, SampleOutcome::DistanceAdded(_)));
        let d = tracker.state().distance_km;
        assert!((d - 0.05).abs() < 0.001, "got {}", d);
    }

    #[test]
    fn test_speed_conversion_and_max() {
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0).with_speed(2.5));
        assert_eq!(tracker.state().current_speed_kmh, 9.0);
        assert_eq!(tracker.state().max_speed_kmh, 9.0);

        tracker.on_sample(sample(38.0001, -1.0, 1_000).with_speed(1.0));
        assert_eq!(tracker.state().current_speed_kmh, 3.6);
        assert_eq!(tracker.state().max_speed_kmh, 9.0);
    }

    #[test]
    fn test_missing_or_negative_speed_leaves_speed_unchanged() {
        let mut tracker = tracker_at_zero();
        tracker.on_sample(sample(38.0, -1.0, 0).with_speed(2.5));
        tracker.on_sample(sample(38.0001, -1.0, 1_000));
        assert_eq!(tracker.state().current_speed_kmh, 9.0);

        tracker.on_sample(sample(38.0002, -1.0, 2_000).with_speed(-1.0));
        assert_eq!(tracker.state().current_speed_kmh, 9.0);
    }

    #[test]
    fn test_avg_pace_undefined_until_distance() {
        let mut tracker = tracker_at_zero();
        tracker.on_tick();
        assert!(tracker.state().avg_pace_min_per_km.is_none());

        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0005, -1.0, 2_500));
        let pace = tracker.state().avg_pace_min_per_km.unwrap();
        assert!(pace > 0.0 && pace.is_finite());
    }

    #[test]
    fn test_avg_pace_value() {
        let mut tracker = tracker_at_zero();
        for _ in 0..300 {
            tracker.on_tick();
        }
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.009, -1.0, 3_000)); // rejected outlier
        // walk up in plausible steps to roughly 1 km
        let mut lat = 38.009;
        let mut t = 3_000;
        for _ in 0..12 {
            lat += 0.00075;
            t += 2_500;
            tracker.on_sample(sample(lat, -1.0, t));
        }
        let distance = tracker.state().distance_km;
        let expected = (300.0 / 60.0) / distance;
        let pace = tracker.state().avg_pace_min_per_km.unwrap();
        assert!((pace - expected).abs() < 1e-9);
    }

    #[test]
    fn test_current_pace_requires_two_window_samples() {
        let mut tracker = tracker_at_zero();
        tracker.on_tick();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0005, -1.0, 2_500));
        // Both samples are inside the 30 s window, so a pace appears
        assert!(tracker.state().current_pace_min_per_km.is_some());
    }

    #[test]
    fn test_current_pace_keeps_previous_when_window_thins() {
        let mut tracker = tracker_at_zero();
        tracker.on_tick();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0005, -1.0, 2_500));
        let first = tracker.state().current_pace_min_per_km.unwrap();

        // Next sample arrives 40 s later: it is alone in its window, so the
        // previous estimate must be retained, not reset
        tracker.on_sample(sample(38.0010, -1.0, 42_500));
        assert_eq!(tracker.state().current_pace_min_per_km, Some(first));
    }

    #[test]
    fn test_current_pace_window_ignores_outlier_gate() {
        // A glitch delta is excluded from the cumulative distance but still
        // contributes to the trailing-window estimate
        let mut tracker = tracker_at_zero();
        tracker.on_tick();
        tracker.on_sample(sample(38.0, -1.0, 0));
        tracker.on_sample(sample(38.0005, -1.0, 2_500));
        let cumulative = tracker.state().distance_km;

        tracker.on_sample(sample(38.0025, -1.0, 5_000)); // glitch
        assert_eq!(tracker.state().distance_km, cumulative);

        // Window distance includes the glitch leg, so the pace is much
        // faster than the cumulative path alone would imply
        let pace = tracker.state().current_pace_min_per_km.unwrap();
        let window_km = 0.0556 + 0.222;
        let expected = (5.0 / 60.0) / window_km;
        assert!((pace - expected).abs() < 0.01, "got {}", pace);
    }

    #[test]
    fn test_distance_and_max_speed_monotone() {
        let mut tracker = tracker_at_zero();
        let mut prev_distance = 0.0;
        let mut prev_max = 0.0;
        let mut lat = 38.0;
        for i in 0..200 {
            lat += if i % 7 == 0 { -0.00002 } else { 0.0004 };
            let speed = if i % 5 == 0 { None } else { Some((i % 13) as f64 * 0.4) };
            let mut s = sample(lat, -1.0, i * 1_300).with_accuracy(((i % 9) * 8) as f64);
            s.speed_mps = speed;
            tracker.on_sample(s);
            tracker.on_tick();

            assert!(tracker.state().distance_km >= prev_distance);
            assert!(tracker.state().max_speed_kmh >= prev_max);
            prev_distance = tracker.state().distance_km;
            prev_max = tracker.state().max_speed_kmh;
        }
    }
}
