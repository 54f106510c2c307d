//! Planar geometry kernel.
//!
//! Cross-sections of the body are treated as point sets in the horizontal
//! (XZ) plane. Their outer boundary is approximated by the convex hull, and a
//! bounding-box ellipse is used when too few points are available for a hull.
//!
//! # Example
//!
//! ```
//! use body_metrics::geometry::{convex_hull_2d, hull_perimeter};
//! use nalgebra::Point2;
//!
//! let square = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(0.5, 0.5),
//! ];
//!
//! let hull = convex_hull_2d(&square).unwrap();
//! assert_eq!(hull.len(), 4);
//! assert!((hull_perimeter(&square).unwrap() - 4.0).abs() < 1e-12);
//! ```

use nalgebra::Point2;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Compute the convex hull of a planar point set (Andrew's monotone chain).
///
/// Returns the hull vertices in counter-clockwise order starting from the
/// lowest-x (then lowest-y) point. Duplicate points are removed first and
/// collinear points on the boundary are dropped.
///
/// Returns `None` when fewer than three distinct, non-collinear points are
/// available. This is not an error: callers treat it as "no measurement".
pub fn convex_hull_2d(points: &[Point2<f64>]) -> Option<Vec<Point2<f64>>> {
    if points.len() < 3 {
        return None;
    }

    let mut pts = points.to_vec();
    pts.sort_by(lexicographic);
    pts.dedup();
    if pts.len() < 3 {
        return None;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);

    if lower.len() < 3 {
        return None;
    }
    Some(lower)
}

/// Perimeter of the convex hull of a planar point set.
///
/// Returns `None` when no hull exists (see [`convex_hull_2d`]).
pub fn hull_perimeter(points: &[Point2<f64>]) -> Option<f64> {
    convex_hull_2d(points).map(|hull| polygon_perimeter(&hull))
}

/// Perimeter of a closed polygon (last vertex connects back to the first).
pub fn polygon_perimeter(polygon: &[Point2<f64>]) -> f64 {
    if polygon.len() < 2 {
        return 0.0;
    }
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| (b - a).norm())
        .sum()
}

/// Approximate the perimeter of an ellipse with semi-axes `a` and `b`.
///
/// Uses Ramanujan's second approximation. Returns `0.0` if either semi-axis is
/// not positive.
pub fn ellipse_perimeter(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    let h = ((a - b) * (a - b)) / ((a + b) * (a + b));
    PI * (a + b) * (1.0 + (3.0 * h) / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Z component of `(a - o) x (b - o)`. Positive for a counter-clockwise turn.
#[inline]
fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn lexicographic(a: &Point2<f64>, b: &Point2<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_interior() -> Vec<Point2<f64>> {
        let mut points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        for i in 0..20 {
            let t = (i as f64 + 1.0) / 22.0;
            points.push(Point2::new(0.1 + 1.8 * t, 1.9 - 1.7 * t * t));
        }
        points
    }

    #[test]
    fn test_hull_of_square_is_corners() {
        let hull = convex_hull_2d(&square_with_interior()).unwrap();
        assert_eq!(hull.len(), 4);
        for corner in [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ] {
            assert!(hull.contains(&corner), "missing corner {corner:?}");
        }
    }

    #[test]
    fn test_hull_perimeter_square() {
        let perimeter = hull_perimeter(&square_with_interior()).unwrap();
        assert!((perimeter - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_hull_is_counter_clockwise() {
        let hull = convex_hull_2d(&square_with_interior()).unwrap();
        let signed_area: f64 = hull
            .iter()
            .zip(hull.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        assert!(signed_area > 0.0);
    }

    #[test]
    fn test_too_few_points() {
        assert!(convex_hull_2d(&[]).is_none());
        assert!(convex_hull_2d(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).is_none());
        assert!(hull_perimeter(&[Point2::new(0.0, 0.0)]).is_none());
    }

    #[test]
    fn test_duplicates_collapse() {
        let points = vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(3.0, 1.0),
            Point2::new(3.0, 1.0),
        ];
        assert!(convex_hull_2d(&points).is_none());
    }

    #[test]
    fn test_collinear_points_have_no_hull() {
        let points: Vec<_> = (0..10).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
        assert!(convex_hull_2d(&points).is_none());
    }

    #[test]
    fn test_collinear_boundary_points_dropped() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let hull = convex_hull_2d(&points).unwrap();
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point2::new(1.0, 0.0)));
    }

    #[test]
    fn test_ellipse_perimeter_circle() {
        let p = ellipse_perimeter(1.0, 1.0);
        assert!((p - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_ellipse_perimeter_known_value() {
        // Ramanujan II is accurate to ~1e-5 relative for moderate eccentricity.
        let p = ellipse_perimeter(3.0, 2.0);
        assert!((p - 15.865_439_9).abs() < 1e-4);
    }

    #[test]
    fn test_ellipse_perimeter_degenerate() {
        assert_eq!(ellipse_perimeter(0.0, 1.0), 0.0);
        assert_eq!(ellipse_perimeter(1.0, -1.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.125_7, 3), -0.126);
        assert_eq!(round_to(180.000_000_000_03, 2), 180.0);
    }
}
