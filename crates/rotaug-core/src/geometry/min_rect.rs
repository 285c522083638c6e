//! Enclosing rectangles for free-form polygons.

use super::types::{GeometryError, Point, Quad};

/// Minimum-area rectangle enclosing all points.
///
/// One side of the optimal rectangle is always collinear with an edge of
/// the convex hull, so every hull edge is tried as the rectangle's first
/// side. The returned corners start at the first side and run along it,
/// which makes `direction()` of the result the angle of that side.
pub fn min_area_rect(points: &[Point]) -> Result<Quad, GeometryError> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return Err(GeometryError::EmptyArea);
    }

    let mut best: Option<(f64, Quad)> = None;
    for i in 0..hull.len() {
        let p = hull[i];
        let q = hull[(i + 1) % hull.len()];
        let len = (q[0] - p[0]).hypot(q[1] - p[1]);
        if len == 0.0 {
            continue;
        }
        let u = [(q[0] - p[0]) / len, (q[1] - p[1]) / len];
        let n = [-u[1], u[0]];

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_n, mut max_n) = (f64::INFINITY, f64::NEG_INFINITY);
        for h in &hull {
            let pu = h[0] * u[0] + h[1] * u[1];
            let pn = h[0] * n[0] + h[1] * n[1];
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_n = min_n.min(pn);
            max_n = max_n.max(pn);
        }

        let area = (max_u - min_u) * (max_n - min_n);
        if best.as_ref().is_some_and(|(a, _)| *a <= area) {
            continue;
        }

        let corner = |su: f64, sn: f64| [su * u[0] + sn * n[0], su * u[1] + sn * n[1]];
        let quad = [
            corner(min_u, min_n),
            corner(max_u, min_n),
            corner(max_u, max_n),
            corner(min_u, max_n),
        ];
        best = Some((area, quad));
    }

    match best {
        Some((area, quad)) if area > 0.0 => Ok(quad),
        _ => Err(GeometryError::EmptyArea),
    }
}

/// Axis-aligned bounding rectangle of the points, corners clockwise from
/// the top-left. `None` for an empty slice.
pub fn bounding_rect(points: &[Point]) -> Option<Quad> {
    if points.is_empty() {
        return None;
    }

    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p[0]), max_x.max(p[0]), min_y.min(p[1]), max_y.max(p[1]))
        },
    );

    Some([
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
    ])
}

/// Andrew's monotone chain. Collinear points are dropped.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: Point, a: Point, b: Point| {
        (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
    };

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(quad: &Quad) -> f64 {
        let mut sum = 0.0;
        for i in 0..4 {
            let p = quad[i];
            let q = quad[(i + 1) % 4];
            sum += p[0] * q[1] - q[0] * p[1];
        }
        sum.abs() / 2.0
    }

    #[test]
    fn test_axis_aligned_rectangle_is_its_own_min_rect() {
        let points = [[10.0, 20.0], [50.0, 20.0], [50.0, 40.0], [10.0, 40.0]];
        let rect = min_area_rect(&points).unwrap();
        assert!((area(&rect) - 800.0).abs() < 1e-9);
        for corner in rect {
            assert!(
                points
                    .iter()
                    .any(|p| (p[0] - corner[0]).abs() < 1e-9 && (p[1] - corner[1]).abs() < 1e-9),
                "unexpected corner {:?}",
                corner
            );
        }
    }

    #[test]
    fn test_rotated_square_is_recovered() {
        let points = [[0.0, 5.0], [5.0, 0.0], [10.0, 5.0], [5.0, 10.0], [5.0, 5.0]];
        let rect = min_area_rect(&points).unwrap();
        // Diamond with diagonals of 10 has area 50, its bounding box 100
        assert!((area(&rect) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_is_enclosed() {
        let points = [[3.0, 1.0], [8.0, 2.0], [9.0, 6.0], [4.0, 7.0], [1.0, 4.0]];
        let rect = min_area_rect(&points).unwrap();
        let bbox = bounding_rect(&points).unwrap();
        assert!(area(&rect) <= area(&bbox) + 1e-9);
    }

    #[test]
    fn test_collinear_points_have_no_area() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        assert_eq!(min_area_rect(&points), Err(GeometryError::EmptyArea));
        assert_eq!(min_area_rect(&[]), Err(GeometryError::EmptyArea));
    }

    #[test]
    fn test_bounding_rect() {
        let points = [[3.0, 1.0], [8.0, 2.0], [9.0, 6.0], [1.0, 4.0]];
        assert_eq!(
            bounding_rect(&points),
            Some([[1.0, 1.0], [9.0, 1.0], [9.0, 6.0], [1.0, 6.0]])
        );
        assert_eq!(bounding_rect(&[]), None);
    }
}
