//! Vector path model for landmark outlines.
//!
//! A [`Path`] is a plain ordered list of [`PathSegment`]s. Producers either
//! build one directly or drive a [`PathSink`]; consumers either walk
//! `segments()` or have the path replay itself into their own sink.

use crate::types::Point;
use serde::{Deserialize, Serialize};

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    /// Begin a new subpath at a point.
    MoveTo(Point),
    /// Straight segment from the current point.
    LineTo(Point),
    /// Quadratic Bézier from the current point.
    QuadCurveTo { control: Point, end: Point },
    /// Cubic Bézier from the current point.
    CubicCurveTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath.
    ClosePath,
}

impl PathSegment {
    /// Defining points of this segment, control points first and the
    /// endpoint last. `ClosePath` yields nothing.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let o = Point::ORIGIN;
        let (buf, n) = match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => ([p, o, o], 1),
            PathSegment::QuadCurveTo { control, end } => ([control, end, o], 2),
            PathSegment::CubicCurveTo {
                control1,
                control2,
                end,
            } => ([control1, control2, end], 3),
            PathSegment::ClosePath => ([o, o, o], 0),
        };
        buf.into_iter().take(n)
    }

    pub fn point_count(&self) -> usize {
        match self {
            PathSegment::MoveTo(_) | PathSegment::LineTo(_) => 1,
            PathSegment::QuadCurveTo { .. } => 2,
            PathSegment::CubicCurveTo { .. } => 3,
            PathSegment::ClosePath => 0,
        }
    }

    /// Copy of this segment with every point shifted by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        match *self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(p + offset),
            PathSegment::LineTo(p) => PathSegment::LineTo(p + offset),
            PathSegment::QuadCurveTo { control, end } => PathSegment::QuadCurveTo {
                control: control + offset,
                end: end + offset,
            },
            PathSegment::CubicCurveTo {
                control1,
                control2,
                end,
            } => PathSegment::CubicCurveTo {
                control1: control1 + offset,
                control2: control2 + offset,
                end: end + offset,
            },
            PathSegment::ClosePath => PathSegment::ClosePath,
        }
    }

    /// Forward this segment to a sink.
    pub fn emit<S: PathSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            PathSegment::MoveTo(p) => sink.move_to(p),
            PathSegment::LineTo(p) => sink.line_to(p),
            PathSegment::QuadCurveTo { control, end } => sink.quad_to(control, end),
            PathSegment::CubicCurveTo {
                control1,
                control2,
                end,
            } => sink.curve_to(control1, control2, end),
            PathSegment::ClosePath => sink.close(),
        }
    }
}

/// Receiver for a sequence of path commands.
pub trait PathSink {
    /// Begin a new subpath at `to`.
    fn move_to(&mut self, to: Point);

    /// Line from the current point to `to`.
    fn line_to(&mut self, to: Point);

    /// Quadratic Bézier with one control point, ending at `to`.
    fn quad_to(&mut self, control: Point, to: Point);

    /// Cubic Bézier with two control points, ending at `to`.
    fn curve_to(&mut self, control1: Point, control2: Point, to: Point);

    /// Close the current subpath.
    fn close(&mut self);
}

/// Ordered sequence of segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// All defining points in traversal order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(PathSegment::points)
    }

    /// Number of defining points across all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(PathSegment::point_count).sum()
    }

    /// Copy of this path with every point shifted by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        self.segments.iter().map(|s| s.translated(offset)).collect()
    }

    /// Drive `sink` with every stored segment, in order.
    pub fn replay<S: PathSink + ?Sized>(&self, sink: &mut S) {
        for segment in &self.segments {
            segment.emit(sink);
        }
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::from_segments(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Recording sink: building a path by issuing commands.
impl PathSink for Path {
    fn move_to(&mut self, to: Point) {
        self.push(PathSegment::MoveTo(to));
    }

    fn line_to(&mut self, to: Point) {
        self.push(PathSegment::LineTo(to));
    }

    fn quad_to(&mut self, control: Point, to: Point) {
        self.push(PathSegment::QuadCurveTo { control, end: to });
    }

    fn curve_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.push(PathSegment::CubicCurveTo {
            control1,
            control2,
            end: to,
        });
    }

    fn close(&mut self) {
        self.push(PathSegment::ClosePath);
    }
}
