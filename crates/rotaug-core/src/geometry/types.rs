//! Core geometric types shared by the rotation, clipping and label modules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2-D point `[x, y]` in image (y-down) coordinates.
///
/// Depending on the label format the unit is either pixels or a fraction
/// of the canvas size.
pub type Point = [f64; 2];

/// Four ordered corner points of a box. The order is never re-sorted by
/// any transform.
pub type Quad = [Point; 4];

/// Errors raised when a box cannot be repaired into the canvas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// No non-negative shift along the long side brings the vertex inside.
    #[error("vertex {vertex} at ({x}, {y}) cannot be moved inside the canvas")]
    Infeasible { vertex: usize, x: f64, y: f64 },

    /// The long side used as the shift direction has zero length.
    #[error("vertex {vertex} has a zero-length adjacent edge")]
    DegenerateEdge { vertex: usize },

    /// The points do not enclose any area (fewer than three distinct,
    /// non-collinear points).
    #[error("points do not span an area")]
    EmptyArea,

    /// Clipping kept pushing vertices out of bounds.
    #[error("clipping did not converge after {iterations} passes")]
    NoConvergence { iterations: usize },
}

/// Width and height of the area a box must stay within.
///
/// Uses the same unit as the points it bounds: pixels for annotation
/// documents, `1.0 x 1.0` for normalized label text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// The unit square used by normalized label formats.
    pub const UNIT: Canvas = Canvas {
        width: 1.0,
        height: 1.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the canvas in image coordinates.
    #[inline]
    pub fn center(&self) -> Point {
        [self.width / 2.0, self.height / 2.0]
    }

    /// True if the point lies inside the closed canvas rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.width).contains(&p[0]) && (0.0..=self.height).contains(&p[1])
    }

    /// True if the point lies inside the open canvas rectangle.
    #[inline]
    pub fn strictly_contains(&self, p: Point) -> bool {
        p[0] > 0.0 && p[0] < self.width && p[1] > 0.0 && p[1] < self.height
    }

    /// The canvas of the rotated image: 90 and 270 degree turns swap the
    /// sides, every other angle keeps them.
    pub fn after(&self, transform: Transform) -> Canvas {
        if transform.swaps_axes() {
            Canvas::new(self.height, self.width)
        } else {
            *self
        }
    }
}

/// One augmentation variant: clockwise angle in degrees and an optional
/// horizontal mirror applied before the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transform {
    pub angle: u32,
    pub flip: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        angle: 0,
        flip: false,
    };

    pub fn new(angle: u32, flip: bool) -> Self {
        Self { angle, flip }
    }

    /// True if the transform leaves every point where it is.
    pub fn is_identity(&self) -> bool {
        self.angle % 360 == 0 && !self.flip
    }

    /// True for 0/90/180/270 degree rotations.
    pub fn is_quarter_turn(&self) -> bool {
        self.angle % 90 == 0
    }

    /// True for 90/270 degree rotations, which exchange width and height.
    pub fn swaps_axes(&self) -> bool {
        self.is_quarter_turn() && self.angle % 180 == 90
    }

    /// Filename suffix identifying this variant, e.g. `1090`.
    pub fn suffix(&self) -> String {
        format!("{}{:03}", u8::from(self.flip), self.angle)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
