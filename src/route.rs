//! Route visualization for a finished run
//!
//! The geometry is plain math and always available: track bounds, a
//! padded projection into a fixed canvas, and the reveal fraction used to
//! animate the route draw. Actual rendering to an image goes through
//! plotters and sits behind the `charts` feature.

use crate::models::PositionSample;

/// Geographic extent of a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Minimum extent in degrees so a short or stationary track still projects
/// to a visible shape instead of collapsing to a point
const MIN_RANGE_DEG: f64 = 0.001;

impl TrackBounds {
    /// Bounds of a track; `None` when there are fewer than two points to
    /// draw a route through
    pub fn of(track: &[PositionSample]) -> Option<Self> {
        if track.len() < 2 {
            return None;
        }

        let mut bounds = TrackBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for sample in track {
            bounds.min_lat = bounds.min_lat.min(sample.latitude_deg);
            bounds.max_lat = bounds.max_lat.max(sample.latitude_deg);
            bounds.min_lon = bounds.min_lon.min(sample.longitude_deg);
            bounds.max_lon = bounds.max_lon.max(sample.longitude_deg);
        }
        Some(bounds)
    }

    pub fn lat_range(&self) -> f64 {
        (self.max_lat - self.min_lat).max(MIN_RANGE_DEG)
    }

    pub fn lon_range(&self) -> f64 {
        (self.max_lon - self.min_lon).max(MIN_RANGE_DEG)
    }
}

/// Target drawing surface
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 460,
            height: 300,
            padding: 20,
        }
    }
}

impl Canvas {
    /// Project a lat/lon point into pixel coordinates, north up
    pub fn project(&self, bounds: &TrackBounds, lat: f64, lon: f64) -> (f64, f64) {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let padding = f64::from(self.padding);

        let x = padding + ((lon - bounds.min_lon) / bounds.lon_range()) * (width - 2.0 * padding);
        let y = height
            - padding
            - ((lat - bounds.min_lat) / bounds.lat_range()) * (height - 2.0 * padding);
        (x, y)
    }
}

/// How many leading track points are visible at `progress` of the reveal
/// animation, with progress clamped to [0, 1]
pub fn visible_points(len: usize, progress: f64) -> usize {
    let progress = progress.clamp(0.0, 1.0);
    (len as f64 * progress).floor() as usize
}

#[cfg(feature = "charts")]
pub use chart::render_route;

#[cfg(feature = "charts")]
mod chart {
    use plotters::prelude::*;
    use std::path::Path;

    use super::{Canvas, TrackBounds};
    use crate::error::{RaceDayError, Result};
    use crate::models::PositionSample;

    /// Draw the full route to a bitmap: light grid, blue polyline, green
    /// start marker, red finish marker
    pub fn render_route<P: AsRef<Path>>(track: &[PositionSample], path: P, canvas: Canvas) -> Result<()> {
        let bounds = TrackBounds::of(track).ok_or_else(|| {
            RaceDayError::Internal("route rendering needs at least two track points".to_string())
        })?;

        let root = BitMapBackend::new(path.as_ref(), (canvas.width, canvas.height))
            .into_drawing_area();
        root.fill(&RGBColor(240, 240, 240))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;

        let grid = RGBColor(224, 224, 224);
        for i in 1..4 {
            let x = (canvas.width / 4 * i) as i32;
            let y = (canvas.height / 4 * i) as i32;
            root.draw(&PathElement::new(
                vec![(x, 0), (x, canvas.height as i32)],
                grid.stroke_width(1),
            ))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;
            root.draw(&PathElement::new(
                vec![(0, y), (canvas.width as i32, y)],
                grid.stroke_width(1),
            ))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;
        }

        let points: Vec<(i32, i32)> = track
            .iter()
            .map(|s| {
                let (x, y) = canvas.project(&bounds, s.latitude_deg, s.longitude_deg);
                (x.round() as i32, y.round() as i32)
            })
            .collect();

        let line = RGBColor(59, 130, 246);
        root.draw(&PathElement::new(points.clone(), line.stroke_width(3)))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;

        let start = RGBColor(16, 185, 129);
        let finish = RGBColor(239, 68, 68);
        root.draw(&Circle::new(points[0], 6, start.filled()))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;
        root.draw(&Circle::new(*points.last().unwrap(), 6, finish.filled()))
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;

        root.present()
            .map_err(|e| RaceDayError::Internal(e.to_string()))?;
        Ok(())
    }
}
