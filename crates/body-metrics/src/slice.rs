//! Horizontal slicing of the body point cloud.
//!
//! The reconstructed mesh is treated as an unstructured point cloud. A
//! cross-section at a given height is the set of vertices inside a thin
//! horizontal band around that height, projected onto the XZ plane.
//!
//! # Example
//!
//! ```
//! use body_metrics::slice::{section_circumference, slice_band};
//! use nalgebra::Point3;
//!
//! // A vertical cylinder of radius 0.1 built from stacked rings.
//! let mut vertices = Vec::new();
//! for ring in 0..21 {
//!     let y = ring as f64 * 0.01;
//!     for i in 0..32 {
//!         let a = i as f64 / 32.0 * std::f64::consts::TAU;
//!         vertices.push(Point3::new(0.1 * a.cos(), y, 0.1 * a.sin()));
//!     }
//! }
//!
//! assert_eq!(slice_band(&vertices, 0.1, 0.005).len(), 32);
//! let girth = section_circumference(&vertices, 0.1, 0.015).unwrap();
//! assert!((girth - 0.2 * std::f64::consts::PI).abs() < 0.01);
//! ```

use crate::geometry::{ellipse_perimeter, hull_perimeter};
use crate::params::{LimbParams, SectionParams};
use nalgebra::{Point2, Point3};
use rayon::prelude::*;
use tracing::trace;

/// Band half-thickness used when scanning for a minimum circumference.
pub const SCAN_BAND_THICKNESS: f64 = 0.015;

/// Growth factor applied to the band between section attempts.
pub const BAND_GROWTH: f64 = 1.5;

/// One rung of the section circumference fallback ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionStrategy {
    /// Convex-hull perimeter of the band's XZ projection.
    HullPerimeter {
        /// Multiplier applied to the base thickness.
        thickness_scale: f64,
    },
    /// Ellipse fitted to the band's XZ bounding box.
    BoundingEllipse {
        /// Multiplier applied to the base thickness.
        thickness_scale: f64,
    },
}

/// Strategies tried in order by [`section_circumference`]: three hull
/// attempts on a growing band, then the ellipse on the band the growth
/// sequence reaches next.
pub const SECTION_LADDER: [SectionStrategy; 4] = [
    SectionStrategy::HullPerimeter {
        thickness_scale: 1.0,
    },
    SectionStrategy::HullPerimeter {
        thickness_scale: BAND_GROWTH,
    },
    SectionStrategy::HullPerimeter {
        thickness_scale: BAND_GROWTH * BAND_GROWTH,
    },
    SectionStrategy::BoundingEllipse {
        thickness_scale: BAND_GROWTH * BAND_GROWTH * BAND_GROWTH,
    },
];

impl SectionStrategy {
    /// Evaluate this strategy at `target_y`.
    pub fn evaluate(
        &self,
        vertices: &[Point3<f64>],
        target_y: f64,
        base_thickness: f64,
        params: &SectionParams,
    ) -> Option<f64> {
        match *self {
            SectionStrategy::HullPerimeter { thickness_scale } => {
                let band = slice_band(vertices, target_y, base_thickness * thickness_scale);
                if band.len() < params.min_hull_points {
                    return None;
                }
                hull_perimeter(&project_xz(&band)).filter(|p| *p > 0.0)
            }
            SectionStrategy::BoundingEllipse { thickness_scale } => {
                let band = slice_band(vertices, target_y, base_thickness * thickness_scale);
                if band.len() < params.min_ellipse_points {
                    return None;
                }
                bounding_ellipse_perimeter(&band)
            }
        }
    }
}

/// All vertices whose height lies within `thickness` of `target_y`.
///
/// Input order is preserved.
pub fn slice_band(vertices: &[Point3<f64>], target_y: f64, thickness: f64) -> Vec<Point3<f64>> {
    vertices
        .iter()
        .filter(|v| (v.y - target_y).abs() <= thickness)
        .copied()
        .collect()
}

/// Project points onto the horizontal plane as `(x, z)`.
pub fn project_xz(points: &[Point3<f64>]) -> Vec<Point2<f64>> {
    points.iter().map(|p| Point2::new(p.x, p.z)).collect()
}

/// Circumference of the horizontal body section at `target_y`.
///
/// Walks [`SECTION_LADDER`] and returns the first available value, or `None`
/// if every strategy fails.
pub fn section_circumference(
    vertices: &[Point3<f64>],
    target_y: f64,
    base_thickness: f64,
) -> Option<f64> {
    section_circumference_with(vertices, target_y, base_thickness, &SectionParams::default())
}

/// [`section_circumference`] with explicit thresholds.
pub fn section_circumference_with(
    vertices: &[Point3<f64>],
    target_y: f64,
    base_thickness: f64,
    params: &SectionParams,
) -> Option<f64> {
    SECTION_LADDER.iter().find_map(|strategy| {
        let value = strategy.evaluate(vertices, target_y, base_thickness, params);
        if value.is_none() {
            trace!(
                target: "body_metrics::slice",
                y = target_y,
                ?strategy,
                "Section attempt failed"
            );
        }
        value
    })
}

/// Find the level with the smallest section circumference between two heights.
///
/// Samples `steps` evenly spaced levels with inclusive endpoints; the bounds
/// may be given in either order. Levels without a section are skipped. On
/// exact ties the lowest level wins.
///
/// Returns `(level, circumference)`, or `None` if `steps` is zero or no level
/// produced a section.
pub fn scan_min_circumference(
    vertices: &[Point3<f64>],
    y_start: f64,
    y_end: f64,
    steps: usize,
) -> Option<(f64, f64)> {
    scan_min_circumference_with(vertices, y_start, y_end, steps, &SectionParams::default(), true)
}

/// [`scan_min_circumference`] with explicit thresholds and parallelism.
///
/// Levels are evaluated on the rayon pool when `parallel` is set; the
/// reduction always runs in ascending order so the result does not depend on
/// scheduling.
pub fn scan_min_circumference_with(
    vertices: &[Point3<f64>],
    y_start: f64,
    y_end: f64,
    steps: usize,
    params: &SectionParams,
    parallel: bool,
) -> Option<(f64, f64)> {
    if steps == 0 {
        return None;
    }
    let (y0, y1) = if y_start <= y_end {
        (y_start, y_end)
    } else {
        (y_end, y_start)
    };
    let levels = linspace(y0, y1, steps);

    let evaluate = |y: &f64| {
        section_circumference_with(vertices, *y, SCAN_BAND_THICKNESS, params).map(|g| (*y, g))
    };
    let samples: Vec<Option<(f64, f64)>> = if parallel {
        levels.par_iter().map(evaluate).collect()
    } else {
        levels.iter().map(evaluate).collect()
    };

    samples
        .into_iter()
        .flatten()
        .fold(None, |best: Option<(f64, f64)>, sample| match best {
            Some(b) if sample.1 >= b.1 => Some(b),
            _ => Some(sample),
        })
}

/// Girth of a single limb around `center` at height `target_y`.
///
/// The band is restricted to points whose horizontal distance to the center's
/// XZ projection is at most `radius`, which separates a limb from the torso
/// and the other limbs. Returns `None` if `center` is absent or too few points
/// remain.
pub fn limb_girth(
    vertices: &[Point3<f64>],
    center: Option<Point3<f64>>,
    target_y: f64,
    radius: f64,
    thickness: f64,
) -> Option<f64> {
    limb_girth_with(vertices, center, target_y, radius, thickness, &LimbParams::default())
}

/// [`limb_girth`] with explicit thresholds.
pub fn limb_girth_with(
    vertices: &[Point3<f64>],
    center: Option<Point3<f64>>,
    target_y: f64,
    radius: f64,
    thickness: f64,
    params: &LimbParams,
) -> Option<f64> {
    let center = center?;
    let band = slice_band(vertices, target_y, thickness);
    if band.len() < params.min_band_points {
        return None;
    }

    let axis = Point2::new(center.x, center.z);
    let selected: Vec<Point2<f64>> = project_xz(&band)
        .into_iter()
        .filter(|p| (p - axis).norm() <= radius)
        .collect();
    if selected.len() < params.min_limb_points {
        return None;
    }
    hull_perimeter(&selected)
}

/// Ellipse perimeter from the XZ bounding box of a band.
fn bounding_ellipse_perimeter(band: &[Point3<f64>]) -> Option<f64> {
    let (min_x, max_x) = extent(band.iter().map(|p| p.x))?;
    let (min_z, max_z) = extent(band.iter().map(|p| p.z))?;
    let width = max_x - min_x;
    let depth = max_z - min_z;
    let a = width.max(depth) / 2.0;
    let b = width.min(depth) / 2.0;
    if a <= 0.0 || b <= 0.0 {
        return None;
    }
    Some(ellipse_perimeter(a, b))
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `count` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
