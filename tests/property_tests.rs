use proptest::prelude::*;

use raceday::display::format_pace;
use raceday::models::PositionSample;
use raceday::tracker::{RunTracker, TrackerConfig};

/// Property tests for the tracking engine invariants

prop_compose! {
    /// Arbitrary GPS observations around a base point, with occasional bad
    /// accuracy and missing or negative speeds
    fn arb_sample()(
        lat_offset in -0.01f64..0.01,
        lon_offset in -0.01f64..0.01,
        accuracy in 0.0f64..80.0,
        speed in proptest::option::of(-1.0f64..12.0),
        jitter_ms in 0i64..5_000,
    ) -> (f64, f64, f64, Option<f64>, i64) {
        (38.0 + lat_offset, -1.0 + lon_offset, accuracy, speed, jitter_ms)
    }
}

proptest! {
    /// Distance and max speed never decrease, whatever the sample stream
    /// looks like, and the pace fields never go non-finite
    #[test]
    fn distance_and_max_speed_are_monotone(samples in prop::collection::vec(arb_sample(), 1..120)) {
        let mut tracker = RunTracker::new(TrackerConfig::default(), 0);
        let mut timestamp_ms = 0i64;
        let mut prev_distance = 0.0;
        let mut prev_max_speed = 0.0;

        for (lat, lon, accuracy, speed, jitter_ms) in samples {
            timestamp_ms += jitter_ms;
            let mut sample = PositionSample::new(lat, lon, timestamp_ms).with_accuracy(accuracy);
            sample.speed_mps = speed;

            tracker.on_sample(sample);
            tracker.on_tick();

            let state = tracker.state();
            prop_assert!(state.distance_km >= prev_distance);
            prop_assert!(state.max_speed_kmh >= prev_max_speed);
            prop_assert!(state.distance_km.is_finite());

            if let Some(pace) = state.avg_pace_min_per_km {
                prop_assert!(pace.is_finite() && pace > 0.0);
            }
            if let Some(pace) = state.current_pace_min_per_km {
                prop_assert!(pace.is_finite() && pace > 0.0);
            }

            prev_distance = state.distance_km;
            prev_max_speed = state.max_speed_kmh;
        }
    }

    /// Low-accuracy samples never change any state
    #[test]
    fn rejected_samples_leave_state_untouched(
        lat in 37.9f64..38.1,
        lon in -1.1f64..-0.9,
        accuracy in 50.1f64..500.0,
    ) {
        let mut tracker = RunTracker::new(TrackerConfig::default(), 0);
        tracker.on_sample(PositionSample::new(38.0, -1.0, 0).with_accuracy(10.0));
        tracker.on_tick();
        let before = tracker.state().clone();

        tracker.on_sample(
            PositionSample::new(lat, lon, 3_000)
                .with_accuracy(accuracy)
                .with_speed(5.0),
        );
        prop_assert_eq!(tracker.state(), &before);
    }

    /// The pace formatter never panics and never leaks a non-finite value
    #[test]
    fn format_pace_is_total(pace in proptest::option::of(prop::num::f64::ANY)) {
        let rendered = format_pace(pace);
        prop_assert!(rendered == "--:--" || rendered.contains(':'));
        prop_assert!(!rendered.contains("inf"));
        prop_assert!(!rendered.contains("NaN"));
    }
}
