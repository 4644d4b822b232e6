use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One GPS observation delivered by the position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Latitude in degrees
    pub latitude_deg: f64,

    /// Longitude in degrees
    pub longitude_deg: f64,

    /// Wall-clock timestamp in milliseconds (monotonic within one run)
    pub timestamp_ms: i64,

    /// Instantaneous speed in meters per second, when the source reports one
    pub speed_mps: Option<f64>,

    /// Self-reported horizontal accuracy radius in meters
    pub accuracy_m: f64,
}

impl PositionSample {
    pub fn new(latitude_deg: f64, longitude_deg: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            timestamp_ms,
            speed_mps: None,
            accuracy_m: 0.0,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = accuracy_m;
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }
}

/// Accumulated state of the run in progress
///
/// `distance_km` and `max_speed_kmh` only ever increase; the pace fields
/// stay `None` until there is both elapsed time and covered distance, so
/// the display layer never sees a NaN or infinite pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Elapsed run time in whole seconds (excludes paused time)
    pub elapsed_seconds: u32,

    /// Cumulative distance in kilometers
    pub distance_km: f64,

    /// Most recent sample that passed the accuracy gate
    pub last_position: Option<PositionSample>,

    /// Timestamp of the last accepted distance contribution
    pub last_distance_update_ms: i64,

    /// Current speed in km/h, from the most recent reported speed
    pub current_speed_kmh: f64,

    /// Maximum speed observed so far in km/h
    pub max_speed_kmh: f64,

    /// Run-long average pace in min/km, `None` until defined
    pub avg_pace_min_per_km: Option<f64>,

    /// Trailing-window pace in min/km, `None` until defined
    pub current_pace_min_per_km: Option<f64>,
}

impl RunState {
    /// Fresh state at run start; `start_ms` seeds the distance throttle
    pub fn at_start(start_ms: i64) -> Self {
        Self {
            elapsed_seconds: 0,
            distance_km: 0.0,
            last_position: None,
            last_distance_update_ms: start_ms,
            current_speed_kmh: 0.0,
            max_speed_kmh: 0.0,
            avg_pace_min_per_km: None,
            current_pace_min_per_km: None,
        }
    }
}

/// Frozen record of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run
    pub id: Uuid,

    /// Date the run was recorded
    pub date: NaiveDate,

    /// Total distance in kilometers
    pub distance_km: f64,

    /// Total duration in seconds
    pub duration_seconds: u32,

    /// Run-long average pace in min/km, if defined
    pub avg_pace_min_per_km: Option<f64>,

    /// Maximum speed observed in km/h
    pub max_speed_kmh: f64,

    /// Full sequence of accuracy-accepted samples, for route rendering
    pub track: Vec<PositionSample>,
}

/// Tri-state completion mark for a planned session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMark {
    Pending,
    Done,
    Skipped,
}

impl Default for CompletionMark {
    fn default() -> Self {
        CompletionMark::Pending
    }
}

impl std::str::FromStr for CompletionMark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CompletionMark::Pending),
            "done" => Ok(CompletionMark::Done),
            "skipped" => Ok(CompletionMark::Skipped),
            _ => Err(format!("Invalid completion mark: {}", s)),
        }
    }
}

impl std::fmt::Display for CompletionMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionMark::Pending => write!(f, "pending"),
            CompletionMark::Done => write!(f, "done"),
            CompletionMark::Skipped => write!(f, "skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_builders() {
        let sample = PositionSample::new(38.0, -1.0, 1000)
            .with_accuracy(12.0)
            .with_speed(2.5);
        assert_eq!(sample.accuracy_m, 12.0);
        assert_eq!(sample.speed_mps, Some(2.5));
    }

    #[test]
    fn test_run_state_at_start() {
        let state = RunState::at_start(5_000);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.distance_km, 0.0);
        assert_eq!(state.last_distance_update_ms, 5_000);
        assert!(state.last_position.is_none());
        assert!(state.avg_pace_min_per_km.is_none());
        assert!(state.current_pace_min_per_km.is_none());
    }

    #[test]
    fn test_completion_mark_serialization() {
        let json = serde_json::to_string(&CompletionMark::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");

        let mark: CompletionMark = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(mark, CompletionMark::Done);
    }

    #[test]
    fn test_completion_mark_from_str() {
        assert_eq!("Done".parse::<CompletionMark>().unwrap(), CompletionMark::Done);
        assert!("finished".parse::<CompletionMark>().is_err());
    }
}
