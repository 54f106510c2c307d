//! Anatomical level estimation.
//!
//! A level is a single Y coordinate at which a measurement is taken. Every
//! level is always defined: when the landmark it is anchored on is missing, a
//! proportional estimate relative to the body height takes its place.

use crate::error::{MeasureResult, MeasurementError};
use crate::landmarks::{SkeletalLandmarks, coalesce};
use crate::params::MeasureParams;
use crate::slice::scan_min_circumference_with;
use nalgebra::Point3;
use tracing::debug;

// ============================================================================
// Proportions
// ============================================================================

/// Torso top as a fraction of the head-top Y when no shoulder data exists.
const TORSO_UPPER_FRACTION: f64 = 0.85;
/// Hip level above ground as a fraction of height.
const HIP_FRACTION: f64 = 0.45;
/// Knee level above ground as a fraction of height.
const KNEE_FRACTION: f64 = 0.26;
/// Ankle level above ground as a fraction of height.
const ANKLE_FRACTION: f64 = 0.05;
/// Lower bound on the torso span as a fraction of height.
const MIN_TORSO_SPAN_FRACTION: f64 = 0.1;
/// Head length as a fraction of height when the neck is unknown.
const HEAD_LENGTH_FRACTION: f64 = 0.13;

// ============================================================================
// Body frame
// ============================================================================

/// Vertical reference frame of a reconstructed body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    /// Lowest vertex Y.
    pub ground_y: f64,
    /// Highest vertex (first one on ties).
    pub head_top: Point3<f64>,
    /// `head_top.y - ground_y`, in meters.
    pub height_m: f64,
}

impl BodyFrame {
    /// Derive the frame from the mesh vertices.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::EmptyMesh`] for an empty vertex set and
    /// [`MeasurementError::InvalidHeight`] if the height is not positive.
    pub fn from_vertices(vertices: &[Point3<f64>]) -> MeasureResult<Self> {
        let first = vertices
            .first()
            .copied()
            .ok_or_else(|| MeasurementError::empty_mesh("Mesh vertices are missing"))?;

        let (ground_y, head_top) =
            vertices
                .iter()
                .skip(1)
                .fold((first.y, first), |(ground, top), v| {
                    (ground.min(v.y), if v.y > top.y { *v } else { top })
                });

        let height_m = head_top.y - ground_y;
        if height_m.is_nan() || height_m <= 0.0 {
            return Err(MeasurementError::invalid_height(height_m));
        }

        Ok(Self {
            ground_y,
            head_top,
            height_m,
        })
    }

    /// Height above ground of an absolute level.
    #[inline]
    pub fn above_ground(&self, y: f64) -> f64 {
        y - self.ground_y
    }

    /// Absolute level at a fraction of the body height.
    #[inline]
    pub fn at_fraction(&self, fraction: f64) -> f64 {
        self.ground_y + fraction * self.height_m
    }
}

// ============================================================================
// Levels
// ============================================================================

/// Every measurement level of one body, in absolute Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyLevels {
    pub torso_upper: f64,
    pub hip: f64,
    /// Distance from hip to torso top, never below a tenth of the height.
    pub torso_span: f64,
    pub bust: f64,
    pub underbust: f64,
    pub knee: f64,
    pub ankle: f64,
    pub waist: f64,
    /// `(level, circumference)` of the narrowest torso section, if found.
    pub waist_scan: Option<(f64, f64)>,
    pub thigh: f64,
    pub calf: f64,
    pub head_length: f64,
    pub head_girth: f64,
    pub neck: f64,
    pub axilla: f64,
    pub upper_arm: f64,
    pub wrist: f64,
}

/// Estimate all levels for a body.
///
/// The waist is searched between just above the hip and just below the torso
/// top; this is the only step that inspects the mesh.
pub fn estimate_levels(
    vertices: &[Point3<f64>],
    frame: &BodyFrame,
    landmarks: &SkeletalLandmarks,
    params: &MeasureParams,
) -> BodyLevels {
    let h = frame.height_m;

    let torso_upper = coalesce([landmarks.acromia.center(), landmarks.shoulders.center()])
        .map_or(TORSO_UPPER_FRACTION * frame.head_top.y, |p| p.y);
    let hip = landmarks
        .hips
        .center()
        .map_or_else(|| frame.at_fraction(HIP_FRACTION), |p| p.y);
    let torso_span = (torso_upper - hip).max(MIN_TORSO_SPAN_FRACTION * h);

    let bust = torso_upper - 0.22 * torso_span;
    let underbust = bust - 0.05 * torso_span;

    let knee = landmarks
        .knees
        .center()
        .map_or_else(|| frame.at_fraction(KNEE_FRACTION), |p| p.y);
    let ankle = landmarks
        .ankles
        .center()
        .map_or_else(|| frame.at_fraction(ANKLE_FRACTION), |p| p.y);

    let waist_scan = scan_min_circumference_with(
        vertices,
        hip + 0.03,
        torso_upper - 0.05,
        params.waist_scan_steps,
        &params.section,
        params.parallel_scan,
    );
    let waist = waist_scan.map_or(hip + 0.15 * torso_span, |(level, _)| level);
    if waist_scan.is_none() {
        debug!(
            target: "body_metrics::levels",
            waist,
            "Waist scan found no section, using proportional level"
        );
    }

    let thigh = hip - 0.25 * (hip - knee);
    let calf = knee - 0.45 * (knee - ankle);

    let head_length = landmarks
        .neck
        .map_or(HEAD_LENGTH_FRACTION * h, |neck| frame.head_top.y - neck.y);
    let head_girth = frame.head_top.y - 0.12 * head_length;
    let neck = landmarks.neck.map_or(torso_upper - 0.05, |p| p.y - 0.01);

    let axilla = hip + 0.7 * (torso_upper - hip);

    let shoulder_ref = coalesce([
        landmarks.shoulders.left,
        landmarks.shoulders.right,
        landmarks.acromia.center(),
    ]);
    let elbow_ref = landmarks.elbows.either();
    let upper_arm = match (shoulder_ref, elbow_ref) {
        (Some(s), Some(e)) => s.y - 0.4 * (s.y - e.y),
        _ => torso_upper - 0.2 * torso_span,
    };
    let wrist = landmarks
        .wrists
        .center()
        .map_or(upper_arm - 0.25, |p| p.y);

    let levels = BodyLevels {
        torso_upper,
        hip,
        torso_span,
        bust,
        underbust,
        knee,
        ankle,
        waist,
        waist_scan,
        thigh,
        calf,
        head_length,
        head_girth,
        neck,
        axilla,
        upper_arm,
        wrist,
    };
    crate::tracing_ext::log_levels(&levels);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Bilateral;

    fn column(height: f64) -> Vec<Point3<f64>> {
        (0..=10)
            .map(|i| Point3::new(0.0, height * i as f64 / 10.0, 0.0))
            .collect()
    }

    #[test]
    fn test_frame_from_vertices() {
        let vertices = vec![
            Point3::new(0.0, 0.1, 0.0),
            Point3::new(0.5, 1.9, 0.0),
            Point3::new(-0.5, 1.9, 0.0),
            Point3::new(0.0, 0.05, 0.0),
        ];
        let frame = BodyFrame::from_vertices(&vertices).unwrap();
        assert_eq!(frame.ground_y, 0.05);
        assert_eq!(frame.head_top, Point3::new(0.5, 1.9, 0.0));
        assert!((frame.height_m - 1.85).abs() < 1e-12);
        assert!((frame.above_ground(1.05) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_frame_errors() {
        let err = BodyFrame::from_vertices(&[]).unwrap_err();
        assert!(matches!(err, MeasurementError::EmptyMesh { .. }));

        let flat = vec![Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0)];
        let err = BodyFrame::from_vertices(&flat).unwrap_err();
        assert!(matches!(err, MeasurementError::InvalidHeight { .. }));
    }

    #[test]
    fn test_proportional_fallbacks() {
        // No landmarks and no sections: every level is proportional.
        let vertices = column(2.0);
        let frame = BodyFrame::from_vertices(&vertices).unwrap();
        let levels = estimate_levels(
            &vertices,
            &frame,
            &SkeletalLandmarks::default(),
            &MeasureParams::default(),
        );

        assert!((levels.torso_upper - 1.7).abs() < 1e-12);
        assert!((levels.hip - 0.9).abs() < 1e-12);
        assert!((levels.torso_span - 0.8).abs() < 1e-12);
        assert!((levels.knee - 0.52).abs() < 1e-12);
        assert!((levels.ankle - 0.1).abs() < 1e-12);
        assert!(levels.waist_scan.is_none());
        assert!((levels.waist - (0.9 + 0.15 * 0.8)).abs() < 1e-12);
        assert!((levels.head_length - 0.26).abs() < 1e-12);
        assert!((levels.neck - 1.65).abs() < 1e-12);
        assert!((levels.upper_arm - (1.7 - 0.16)).abs() < 1e-12);
        assert!((levels.wrist - (levels.upper_arm - 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_torso_span_clamped() {
        // Shoulders below the hips would give a negative span.
        let vertices = column(1.0);
        let frame = BodyFrame::from_vertices(&vertices).unwrap();
        let landmarks = SkeletalLandmarks {
            shoulders: Bilateral::new(Some(Point3::new(0.2, 0.4, 0.0)), None),
            hips: Bilateral::new(Some(Point3::new(0.1, 0.5, 0.0)), None),
            ..Default::default()
        };
        let levels = estimate_levels(&vertices, &frame, &landmarks, &MeasureParams::default());
        assert!((levels.torso_span - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_landmark_anchored_levels() {
        let vertices = column(1.8);
        let frame = BodyFrame::from_vertices(&vertices).unwrap();
        let landmarks = SkeletalLandmarks {
            neck: Some(Point3::new(0.0, 1.5, 0.0)),
            shoulders: Bilateral::new(
                Some(Point3::new(0.2, 1.42, 0.0)),
                Some(Point3::new(-0.2, 1.42, 0.0)),
            ),
            acromia: Bilateral::new(
                Some(Point3::new(0.2, 1.44, 0.0)),
                Some(Point3::new(-0.2, 1.44, 0.0)),
            ),
            elbows: Bilateral::new(None, Some(Point3::new(-0.25, 1.12, 0.0))),
            hips: Bilateral::new(
                Some(Point3::new(0.1, 0.9, 0.0)),
                Some(Point3::new(-0.1, 0.9, 0.0)),
            ),
            knees: Bilateral::new(Some(Point3::new(0.1, 0.5, 0.0)), None),
            ankles: Bilateral::new(None, Some(Point3::new(-0.1, 0.08, 0.0))),
            ..Default::default()
        };
        let levels = estimate_levels(&vertices, &frame, &landmarks, &MeasureParams::default());

        assert!((levels.torso_upper - 1.44).abs() < 1e-12);
        assert!((levels.hip - 0.9).abs() < 1e-12);
        assert!((levels.knee - 0.5).abs() < 1e-12);
        assert!((levels.ankle - 0.08).abs() < 1e-12);
        assert!((levels.thigh - 0.8).abs() < 1e-12);
        assert!((levels.calf - (0.5 - 0.45 * 0.42)).abs() < 1e-12);
        assert!((levels.neck - 1.49).abs() < 1e-12);
        assert!((levels.head_length - 0.3).abs() < 1e-12);
        assert!((levels.head_girth - (1.8 - 0.036)).abs() < 1e-12);
        assert!((levels.axilla - (0.9 + 0.7 * 0.54)).abs() < 1e-12);
        // Left shoulder with the right elbow.
        assert!((levels.upper_arm - (1.42 - 0.4 * 0.3)).abs() < 1e-12);
    }
}
