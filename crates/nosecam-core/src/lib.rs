//! nosecam-core — Landmark outline centroids and the nose capture trigger.
//!
//! A detector's nose outline arrives as a vector path; its center is the
//! mean of the path's defining points. The trigger watches that center and
//! fires a debounced capture when it enters the target region.

pub mod centroid;
pub mod landmark;
pub mod path;
pub mod trigger;
pub mod types;

pub use centroid::{centroid, CentroidAccumulator, EmptyPathError};
pub use landmark::{LandmarkError, LandmarkRegion};
pub use path::{Path, PathSegment, PathSink};
pub use trigger::{CaptureTrigger, TriggerConfig, TriggerDecision};
pub use types::{Point, Rect};
