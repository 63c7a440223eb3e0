//! Landmark regions normalized to a face bounding box.
//!
//! Detectors report a landmark outline (nose, eye, lips) as points in
//! `[0, 1]` relative to the detected face rectangle. Mapping them into layer
//! coordinates and closing the outline yields a [`Path`] ready for
//! [`centroid`](crate::centroid::centroid).

use crate::centroid::EmptyPathError;
use crate::path::{Path, PathSink};
use crate::types::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("landmark region has no points")]
    EmptyRegion,
    #[error("face rectangle has no usable area: {0:?}")]
    InvalidFace(Rect),
    #[error("landmark point {index} is not finite: {point:?}")]
    NonFinitePoint { index: usize, point: Point },
}

impl From<EmptyPathError> for LandmarkError {
    fn from(_: EmptyPathError) -> Self {
        LandmarkError::EmptyRegion
    }
}

/// A landmark outline in face-relative normalized coordinates
/// (top-left origin, `(1, 1)` at the bottom-right of the face box).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRegion {
    pub points: Vec<Point>,
    #[serde(default = "default_closed")]
    pub closed: bool,
}

fn default_closed() -> bool {
    true
}

impl LandmarkRegion {
    /// A closed outline through `points`.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Map one normalized point into the face rectangle.
    pub fn denormalize(p: Point, face: &Rect) -> Point {
        Point::new(face.x + p.x * face.width, face.y + p.y * face.height)
    }

    /// Polyline path through the region's points in layer coordinates.
    pub fn to_path(&self, face: &Rect) -> Result<Path, LandmarkError> {
        if !face.has_area() {
            return Err(LandmarkError::InvalidFace(*face));
        }
        if let Some((index, &point)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite())
        {
            return Err(LandmarkError::NonFinitePoint { index, point });
        }
        let (first, rest) = self
            .points
            .split_first()
            .ok_or(LandmarkError::EmptyRegion)?;

        let mut path = Path::new();
        path.move_to(Self::denormalize(*first, face));
        for &p in rest {
            path.line_to(Self::denormalize(p, face));
        }
        if self.closed {
            path.close();
        }
        Ok(path)
    }

    /// Center of the outline in layer coordinates.
    pub fn center_in(&self, face: &Rect) -> Result<Point, LandmarkError> {
        let path = self.to_path(face)?;
        Ok(path.centroid()?)
    }
}
