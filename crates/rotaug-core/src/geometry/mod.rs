//! Geometric transform and canvas-clipping engine.
//!
//! Everything in here is pure math over [`Point`]s and [`Quad`]s; no file
//! or image access happens at this level.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Rotation angles are in degrees, positive = clockwise
//! - A flip is a horizontal mirror about the vertical centerline and is
//!   always applied before the rotation
//! - Normalized label formats use the unit canvas `1.0 x 1.0`

mod clip;
mod direction;
mod min_rect;
mod rotation;
mod types;

pub use clip::{clip_to_canvas, is_missing};
pub use direction::direction;
pub use min_rect::{bounding_rect, min_area_rect};
pub use rotation::{rotate_point, rotate_quad, rotate_quad_to_frame};
pub use types::{Canvas, GeometryError, Point, Quad, Transform};

pub(crate) use rotation::sin_cos_deg;
