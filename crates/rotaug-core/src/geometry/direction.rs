//! Canonical direction of an oriented box.

use std::f64::consts::TAU;

use super::types::Quad;

/// Direction of the box's first edge (`quad[0] -> quad[1]`) in radians,
/// normalized to `[0, 2*pi)`.
///
/// Must be recomputed after every rotation or clip; it is never carried
/// over from the untransformed box.
pub fn direction(quad: &Quad) -> f64 {
    let dx = quad[1][0] - quad[0][0];
    let dy = quad[1][1] - quad[0][1];

    let mut degrees = dy.atan2(dx).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // Also folds -0.0 into 0.0
    if degrees >= 360.0 || degrees == 0.0 {
        return 0.0;
    }

    let radians = degrees.to_radians();
    if radians >= TAU {
        0.0
    } else {
        radians
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
