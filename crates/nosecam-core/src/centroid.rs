//! Representative center of a landmark outline.
//!
//! The center is the unweighted mean of every defining point in the path:
//! move/line endpoints, Bézier control points and Bézier endpoints each count
//! once. It is not an area or arc-length centroid; control points generally
//! lie off the drawn curve and still pull the result toward them.

use crate::path::{Path, PathSink};
use crate::types::Point;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("path contributes no points; centroid is undefined")]
pub struct EmptyPathError;

/// Running sums for the centroid, usable directly as a [`PathSink`].
///
/// Sums are kept in `f64` so large or numerous `f32` coordinates neither
/// overflow nor drift; the mean is narrowed back to `f32` in `finish`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidAccumulator {
    sum_x: f64,
    sum_y: f64,
    count: usize,
}

impl CentroidAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, p: Point) {
        self.sum_x += p.x as f64;
        self.sum_y += p.y as f64;
        self.count += 1;
    }

    /// Number of points accumulated so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(&self) -> Result<Point, EmptyPathError> {
        if self.count == 0 {
            return Err(EmptyPathError);
        }
        let n = self.count as f64;
        Ok(Point::new((self.sum_x / n) as f32, (self.sum_y / n) as f32))
    }
}

impl PathSink for CentroidAccumulator {
    fn move_to(&mut self, to: Point) {
        self.add(to);
    }

    fn line_to(&mut self, to: Point) {
        self.add(to);
    }

    fn quad_to(&mut self, control: Point, to: Point) {
        self.add(control);
        self.add(to);
    }

    fn curve_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.add(control1);
        self.add(control2);
        self.add(to);
    }

    fn close(&mut self) {}
}

/// Mean of all defining points of `path`.
///
/// Fails with [`EmptyPathError`] when no segment carries a point (an empty
/// path, or one made only of `ClosePath`).
pub fn centroid(path: &Path) -> Result<Point, EmptyPathError> {
    let acc = path
        .points()
        .fold(CentroidAccumulator::new(), |mut acc, p| {
            acc.add(p);
            acc
        });
    let center = acc.finish()?;
    tracing::trace!(
        segments = path.len(),
        points = acc.count(),
        x = center.x,
        y = center.y,
        "path centroid"
    );
    Ok(center)
}

impl Path {
    /// See [`centroid`].
    pub fn centroid(&self) -> Result<Point, EmptyPathError> {
        centroid(self)
    }
}
