//! Position sources
//!
//! The tracking engine is fed by a position source: something that hands
//! out a cancellable subscription yielding fixes or transport errors. The
//! configuration knobs (accuracy preference, staleness, fix timeout) are
//! advisory hints to the source; nothing downstream enforces them.
//!
//! The built-in source replays a recorded run from a GPX track or a CSV
//! sample log, which drives the engine exactly as a live receiver would.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::models::PositionSample;

/// Advisory configuration for a position source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Prefer the high-accuracy positioning mode
    pub high_accuracy: bool,

    /// Maximum age of a cached fix the source may hand out (milliseconds)
    pub max_staleness_ms: i64,

    /// How long the source may wait for a fix before reporting an error
    /// (milliseconds)
    pub fix_timeout_ms: i64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_staleness_ms: 1_000,
            fix_timeout_ms: 5_000,
        }
    }
}

/// One event delivered by a position subscription
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// A position fix
    Fix(PositionSample),
    /// A transport error (permission denied, timeout, hardware). Logged by
    /// the consumer; tracking continues with no samples until the source
    /// recovers.
    Error(String),
}

/// A source of position subscriptions
pub trait PositionSource {
    /// Open a subscription. Options are advisory.
    fn subscribe(&self, options: &SourceOptions) -> Result<PositionSubscription>;
}

/// A cancellable stream of position events
///
/// Dropping the subscription releases it; `cancel` does the same
/// explicitly and stops any further events.
pub struct PositionSubscription {
    events: std::vec::IntoIter<PositionEvent>,
    cancelled: bool,
}

impl PositionSubscription {
    fn new(events: Vec<PositionEvent>) -> Self {
        Self {
            events: events.into_iter(),
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

impl Iterator for PositionSubscription {
    type Item = PositionEvent;

    fn next(&mut self) -> Option<PositionEvent> {
        if self.cancelled {
            None
        } else {
            self.events.next()
        }
    }
}

/// Replay source backed by a recorded sample sequence
pub struct ReplaySource {
    samples: Vec<PositionSample>,
}

/// CSV record layout: `lat,lon,timestamp_ms,speed_mps,accuracy_m`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    lat: f64,
    lon: f64,
    timestamp_ms: i64,
    speed_mps: Option<f64>,
    accuracy_m: Option<f64>,
}

impl ReplaySource {
    pub fn from_samples(samples: Vec<PositionSample>) -> Self {
        Self { samples }
    }

    /// Load a replay from a file, picking the parser by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "gpx" => Self::from_gpx_file(path),
            "csv" => Self::from_csv_file(path),
            other => Err(ImportError::UnsupportedFormat {
                format: other.to_string(),
            }
            .into()),
        }
    }

    /// Load a replay from a GPX track
    ///
    /// Points without time data get synthesized 1 Hz timestamps so old
    /// exports without `<time>` elements still replay.
    pub fn from_gpx_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let gpx = gpx::read(BufReader::new(file)).map_err(|err| ImportError::ParseError {
            format: "GPX".to_string(),
            reason: err.to_string(),
        })?;

        let mut samples = Vec::new();
        let mut index: i64 = 0;
        for track in &gpx.tracks {
            for segment in &track.segments {
                for waypoint in &segment.points {
                    let point = waypoint.point();
                    let timestamp_ms = match waypoint.time.as_ref() {
                        Some(t) => {
                            let odt = time::OffsetDateTime::from(t.clone());
                            (odt.unix_timestamp_nanos() / 1_000_000) as i64
                        }
                        None => index * 1_000,
                    };

                    let mut sample = PositionSample::new(point.y(), point.x(), timestamp_ms);
                    sample.speed_mps = waypoint.speed;
                    samples.push(sample);
                    index += 1;
                }
            }
        }

        if samples.is_empty() {
            return Err(ImportError::MissingData {
                field: "track points".to_string(),
            }
            .into());
        }

        Ok(Self { samples })
    }

    /// Load a replay from a CSV sample log
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref()).map_err(|err| {
            ImportError::ParseError {
                format: "CSV".to_string(),
                reason: err.to_string(),
            }
        })?;

        let mut samples = Vec::new();
        for record in reader.deserialize() {
            let record: CsvRecord = record.map_err(|err| ImportError::ParseError {
                format: "CSV".to_string(),
                reason: err.to_string(),
            })?;

            let mut sample = PositionSample::new(record.lat, record.lon, record.timestamp_ms);
            sample.speed_mps = record.speed_mps;
            sample.accuracy_m = record.accuracy_m.unwrap_or(0.0);
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(ImportError::MissingData {
                field: "samples".to_string(),
            }
            .into());
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }
}

impl PositionSource for ReplaySource {
    fn subscribe(&self, _options: &SourceOptions) -> Result<PositionSubscription> {
        Ok(PositionSubscription::new(
            self.samples.iter().copied().map(PositionEvent::Fix).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_replay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "lat,lon,timestamp_ms,speed_mps,accuracy_m").unwrap();
        writeln!(file, "38.0,-1.0,0,2.5,10").unwrap();
        writeln!(file, "38.0005,-1.0,2500,,").unwrap();
        drop(file);

        let source = ReplaySource::from_file(&path).unwrap();
        let samples = source.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].speed_mps, Some(2.5));
        assert_eq!(samples[0].accuracy_m, 10.0);
        assert_eq!(samples[1].speed_mps, None);
        assert_eq!(samples[1].accuracy_m, 0.0);
    }

    #[test]
    fn test_gpx_replay_with_times() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.gpx");
        std::fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="raceday-test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="38.0" lon="-1.0"><time>2025-12-01T09:00:00Z</time></trkpt>
    <trkpt lat="38.0005" lon="-1.0"><time>2025-12-01T09:00:03Z</time></trkpt>
  </trkseg></trk>
</gpx>"#,
        )
        .unwrap();

        let source = ReplaySource::from_file(&path).unwrap();
        let samples = source.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].latitude_deg, 38.0);
        assert_eq!(samples[0].longitude_deg, -1.0);
        assert_eq!(samples[1].timestamp_ms - samples[0].timestamp_ms, 3_000);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.fit");
        std::fs::write(&path, b"").unwrap();
        assert!(ReplaySource::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(ReplaySource::from_file("/nonexistent/run.gpx").is_err());
    }

    #[test]
    fn test_subscription_yields_fixes_and_cancels() {
        let source = ReplaySource::from_samples(vec![
            PositionSample::new(38.0, -1.0, 0),
            PositionSample::new(38.0001, -1.0, 1_000),
        ]);

        let mut sub = source.subscribe(&SourceOptions::default()).unwrap();
        assert!(matches!(sub.next(), Some(PositionEvent::Fix(_))));
        sub.cancel();
        assert!(sub.next().is_none());
    }
}
