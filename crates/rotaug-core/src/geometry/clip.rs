//! Shape-preserving clipping of a rotated box into the canvas.
//!
//! Clamping each corner independently would break the rectangle. Instead,
//! for every corner `a` outside the canvas we take its two neighbours: `b`
//! across the long side and `c` across the short side. The whole short
//! edge `a-c` is slid along `v = b - a` by the smallest `k >= 0` that puts
//! `a` back inside:
//!
//! ```text
//! min k  s.t.  k >= 0
//!              0 <= a.x + k * v.x <= width
//!              0 <= a.y + k * v.y <= height
//! ```
//!
//! With a single unknown this is the intersection of four half-lines, so
//! it is solved in closed form.

use tracing::trace;

use super::types::{Canvas, GeometryError, Point, Quad};

/// Coordinates this close to an edge are snapped onto it.
const SNAP_TOLERANCE: f64 = 8.0e-5;

/// Slack accepted when intersecting the half-line constraints.
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Upper bound on full sweeps over the four corners.
const MAX_PASSES: usize = 64;

/// True if no corner lies strictly inside the canvas, i.e. the box has
/// rotated completely out of frame.
pub fn is_missing(quad: &Quad, canvas: Canvas) -> bool {
    quad.iter().all(|&p| !canvas.strictly_contains(p))
}

/// Move out-of-canvas corners back inside while keeping side lengths and
/// parallel sides.
///
/// On success every corner satisfies `0 <= x <= width` and
/// `0 <= y <= height`. A box that cannot be repaired returns a
/// [`GeometryError`] and must be rejected by the caller; `quad` is left in
/// a partially moved state in that case.
pub fn clip_to_canvas(quad: &mut Quad, canvas: Canvas) -> Result<(), GeometryError> {
    clip_with(quad, canvas, |_, _, slide| {
        trace!("slid corners {:?} along {:?}", slide.moved, slide.along);
    })
}

/// One slide of a short edge: the outside corner and its short-side
/// neighbour, both moved along the long side `along`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slide {
    moved: [usize; 2],
    along: Point,
}

/// [`clip_to_canvas`] with a callback seeing the box before and after
/// every slide.
fn clip_with(
    quad: &mut Quad,
    canvas: Canvas,
    mut on_slide: impl FnMut(&Quad, &Quad, Slide),
) -> Result<(), GeometryError> {
    for _ in 0..MAX_PASSES {
        if quad.iter().all(|&p| canvas.contains(p)) {
            return Ok(());
        }

        for i in 0..4 {
            if canvas.contains(quad[i]) {
                continue;
            }
            let before = *quad;
            let slide = slide_corner(quad, i, canvas)?;
            on_slide(&before, quad, slide);
        }
    }

    if quad.iter().all(|&p| canvas.contains(p)) {
        Ok(())
    } else {
        Err(GeometryError::NoConvergence {
            iterations: MAX_PASSES,
        })
    }
}

/// Slide the short edge at corner `i` until the corner is inside.
///
/// The long side is picked from the current corner positions, so it can
/// change from one slide to the next once an edge has been shortened.
fn slide_corner(quad: &mut Quad, i: usize, canvas: Canvas) -> Result<Slide, GeometryError> {
    let a = quad[i];
    let prev = (i + 3) % 4;
    let next = (i + 1) % 4;
    let (b, c) = if distance(a, quad[prev]) > distance(a, quad[next]) {
        (prev, next)
    } else {
        (next, prev)
    };

    let v = [quad[b][0] - a[0], quad[b][1] - a[1]];
    if v[0] == 0.0 && v[1] == 0.0 {
        return Err(GeometryError::DegenerateEdge { vertex: i });
    }

    let k = min_shift(a, v, canvas).ok_or(GeometryError::Infeasible {
        vertex: i,
        x: a[0],
        y: a[1],
    })?;

    translate(&mut quad[i], v, k, canvas);
    translate(&mut quad[c], v, k, canvas);
    Ok(Slide {
        moved: [i, c],
        along: v,
    })
}

/// Smallest `k >= 0` such that `a + k * v` is inside the canvas.
///
/// Each constraint has the form `coef * k <= bound`. Positive coefficients
/// cap `k` from above, negative ones from below, and a zero coefficient is
/// either always or never satisfied.
fn min_shift(a: Point, v: Point, canvas: Canvas) -> Option<f64> {
    let constraints = [
        (-v[0], a[0]),
        (v[0], canvas.width - a[0]),
        (-v[1], a[1]),
        (v[1], canvas.height - a[1]),
    ];

    let mut lo = 0.0f64;
    let mut hi = f64::INFINITY;
    for (coef, bound) in constraints {
        if coef > 0.0 {
            hi = hi.min(bound / coef);
        } else if coef < 0.0 {
            lo = lo.max(bound / coef);
        } else if bound < -FEASIBILITY_TOLERANCE {
            return None;
        }
    }

    if lo.is_finite() && lo <= hi + FEASIBILITY_TOLERANCE {
        Some(lo)
    } else {
        None
    }
}

fn translate(point: &mut Point, v: Point, k: f64, canvas: Canvas) {
    point[0] = snap(point[0] + v[0] * k, canvas.width);
    point[1] = snap(point[1] + v[1] * k, canvas.height);
}

/// Absorb floating-point error at the canvas edges.
#[inline]
fn snap(value: f64, limit: f64) -> f64 {
    if value.abs() < SNAP_TOLERANCE {
        0.0
    } else if (value - limit).abs() < SNAP_TOLERANCE {
        limit
    } else {
        value
    }
}

#[inline]
fn distance(p: Point, q: Point) -> f64 {
    (p[0] - q[0]).hypot(p[1] - q[1])
}


// ============================================================================
// Property-Based Tests
// ============================================================================
