//! Landmarks picked directly from mesh vertices.
//!
//! These points have no keypoint counterpart and are located by searching
//! the vertex cloud near an estimated level. Each search returns an actual
//! vertex, never an interpolated position.

use crate::landmarks::{SkeletalLandmarks, Side};
use crate::levels::BodyLevels;
use crate::slice::slice_band;
use nalgebra::Point3;

/// Band half-thickness for the axilla search.
pub const AXILLA_BAND: f64 = 0.025;

/// Band half-thickness for the waist front/back search.
pub const WAIST_BAND: f64 = 0.02;

/// Front (max Z) and back (min Z) extremes of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrontBack {
    pub front: Option<Point3<f64>>,
    pub back: Option<Point3<f64>>,
}

impl FrontBack {
    fn of(points: &[Point3<f64>]) -> Self {
        Self {
            front: first_extreme(points, |a, b| a.z > b.z),
            back: first_extreme(points, |a, b| a.z < b.z),
        }
    }
}

/// All vertex-derived landmarks of one body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceLandmarks {
    pub crotch: Option<Point3<f64>>,
    pub axilla_left: FrontBack,
    pub axilla_right: FrontBack,
    pub waist: FrontBack,
}

impl SurfaceLandmarks {
    /// Search the mesh at the estimated levels.
    ///
    /// The torso midline is the hip center's X, or 0 without hips.
    pub fn locate(
        vertices: &[Point3<f64>],
        landmarks: &SkeletalLandmarks,
        levels: &BodyLevels,
    ) -> Self {
        let hip_center = landmarks.hips.center();
        let center_x = hip_center.map_or(0.0, |p| p.x);
        Self {
            crotch: crotch_point(vertices, hip_center, levels.knee),
            axilla_left: axilla_points(vertices, levels.axilla, center_x, Side::Left),
            axilla_right: axilla_points(vertices, levels.axilla, center_x, Side::Right),
            waist: waist_front_back(vertices, levels.waist),
        }
    }
}

/// Lowest vertex in the crotch search box below the hip center.
///
/// Candidates lie strictly between `knee_level − 0.05` and the hip height,
/// within 0.12 laterally and 0.2 in depth of the hip center.
pub fn crotch_point(
    vertices: &[Point3<f64>],
    hip_center: Option<Point3<f64>>,
    knee_level: f64,
) -> Option<Point3<f64>> {
    let hip = hip_center?;
    let lower = knee_level - 0.05;
    let candidates: Vec<Point3<f64>> = vertices
        .iter()
        .filter(|v| {
            v.y < hip.y
                && v.y > lower
                && (v.x - hip.x).abs() < 0.12
                && (v.z - hip.z).abs() < 0.2
        })
        .copied()
        .collect();
    first_extreme(&candidates, |a, b| a.y < b.y)
}

/// Front and back armpit points on one side of the torso.
///
/// The left side is `x >= center_x`, the right side `x <= center_x`.
pub fn axilla_points(
    vertices: &[Point3<f64>],
    level_y: f64,
    center_x: f64,
    side: Side,
) -> FrontBack {
    let side_points: Vec<Point3<f64>> = slice_band(vertices, level_y, AXILLA_BAND)
        .into_iter()
        .filter(|p| match side {
            Side::Left => p.x >= center_x,
            Side::Right => p.x <= center_x,
        })
        .collect();
    FrontBack::of(&side_points)
}

/// Most anterior and most posterior vertices at the waist.
pub fn waist_front_back(vertices: &[Point3<f64>], waist_y: f64) -> FrontBack {
    FrontBack::of(&slice_band(vertices, waist_y, WAIST_BAND))
}

/// Point that beats every later point under `better`; earliest wins ties.
fn first_extreme<F>(points: &[Point3<f64>], better: F) -> Option<Point3<f64>>
where
    F: Fn(&Point3<f64>, &Point3<f64>) -> bool,
{
    points.iter().copied().reduce(|best, p| if better(&p, &best) { p } else { best })
}
