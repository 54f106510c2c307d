//! Measurement assembly.
//!
//! Combines the frame, landmarks and levels of a rig into the full set of
//! body measurements, then scales them to the requested height.
//!
//! All raw values are in meters (degrees for the shoulder slope). Scaling
//! converts lengths to centimeters and applies the height scale factor.

use crate::error::{MeasureResult, MeasurementError};
use crate::geometry::round_to;
use crate::landmarks::{Bilateral, LandmarkSource, Side, SkeletalLandmarks, average};
use crate::levels::{BodyFrame, BodyLevels, estimate_levels};
use crate::params::MeasureParams;
use crate::registry::{MeasurementKey, Unit, schema};
use crate::report::{LandmarkKey, LandmarkValue, LevelMetadata, MeasurementReport};
use crate::slice::{limb_girth_with, section_circumference_with};
use crate::surface::SurfaceLandmarks;
use crate::tracing_ext::{OperationTimer, log_report_summary, log_rig_stats};
use crate::types::Rig;
use nalgebra::{Point3, Vector2, distance};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Smallest horizontal offset for which the shoulder slope is defined.
const MIN_SLOPE_LATERAL: f64 = 1e-6;

// ============================================================================
// Entry points
// ============================================================================

/// Measure one rig.
///
/// `target_height_cm` rescales every length so that the body height equals
/// the target; `None` keeps the reconstructed height.
///
/// # Errors
///
/// - [`MeasurementError::EmptyMesh`] if the rig has no vertices
/// - [`MeasurementError::InvalidHeight`] if the reconstructed height is not positive
/// - [`MeasurementError::InvalidTargetHeight`] if the target is not a positive number
///
/// # Example
///
/// ```
/// use body_metrics::{MeasurementKey, Rig, compute_measurements};
///
/// let rig = Rig::from_vertices([[0.0, 0.0, 0.0], [0.1, 1.75, 0.0]]);
/// let report = compute_measurements(&rig, None).unwrap();
///
/// assert_eq!(report.actual_height_cm, 175.0);
/// assert_eq!(report.scale_factor, 1.0);
/// assert_eq!(report.get(MeasurementKey::BodyHeight), Some(175.0));
/// assert!(report.get(MeasurementKey::WaistGirth).is_none());
/// ```
pub fn compute_measurements(
    rig: &Rig,
    target_height_cm: Option<f64>,
) -> MeasureResult<MeasurementReport> {
    compute_measurements_with_params(rig, target_height_cm, &MeasureParams::default())
}

/// [`compute_measurements`] with explicit parameters.
///
/// # Errors
///
/// As [`compute_measurements`], plus [`MeasurementError::InvalidParams`] if
/// `params` fail validation.
pub fn compute_measurements_with_params(
    rig: &Rig,
    target_height_cm: Option<f64>,
    params: &MeasureParams,
) -> MeasureResult<MeasurementReport> {
    params.validate()?;

    let timer = OperationTimer::with_context(
        "compute_measurements",
        rig.vertex_count(),
        rig.keypoints.len(),
    );
    let _enter = timer.span().enter();
    log_rig_stats(rig, "input");

    let vertices = rig.vertex_points();
    let frame = BodyFrame::from_vertices(&vertices)?;
    let actual_height_cm = frame.height_m * 100.0;
    let target_height_cm = resolve_target(target_height_cm, actual_height_cm)?;
    let scale_factor = target_height_cm / actual_height_cm;

    let source = LandmarkSource::from_rig(rig);
    let skeletal = SkeletalLandmarks::resolve(&source);
    debug!(
        target: "body_metrics::measure",
        keypoints = source.keypoint_count(),
        joints = source.joint_count(),
        resolved = skeletal.resolved_count(),
        "Landmarks resolved"
    );

    let levels = estimate_levels(&vertices, &frame, &skeletal, params);
    let surface = SurfaceLandmarks::locate(&vertices, &skeletal, &levels);

    let body = Body {
        vertices: &vertices,
        frame: &frame,
        skeletal: &skeletal,
        levels: &levels,
        surface: &surface,
        params,
    };
    let measurements = scale_measurements(body.raw_measurements(), scale_factor);

    let report = MeasurementReport {
        actual_height_cm: round_to(actual_height_cm, 2),
        target_height_cm: round_to(target_height_cm, 2),
        scale_factor: round_to(scale_factor, 4),
        measurements,
        landmarks: body.landmark_record(),
        metadata: LevelMetadata {
            waist_level_y: round_to(levels.waist, 5),
            hip_level_y: round_to(levels.hip, 5),
            bust_level_y: round_to(levels.bust, 5),
        },
        schema: schema(),
    };
    log_report_summary(&report);
    Ok(report)
}

/// Measure several rigs in parallel.
///
/// Each rig is measured independently with the same target and parameters;
/// results are returned in input order.
pub fn compute_all(
    rigs: &[Rig],
    target_height_cm: Option<f64>,
    params: &MeasureParams,
) -> Vec<MeasureResult<MeasurementReport>> {
    let _timer = OperationTimer::new("compute_all");
    let results: Vec<_> = rigs
        .par_iter()
        .map(|rig| compute_measurements_with_params(rig, target_height_cm, params))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(
            target: "body_metrics::measure",
            failed,
            total = rigs.len(),
            "Some rigs could not be measured"
        );
    }
    results
}

impl Rig {
    /// Measure this rig. See [`compute_measurements`].
    pub fn measure(&self, target_height_cm: Option<f64>) -> MeasureResult<MeasurementReport> {
        compute_measurements(self, target_height_cm)
    }
}

fn resolve_target(target_height_cm: Option<f64>, actual_height_cm: f64) -> MeasureResult<f64> {
    match target_height_cm {
        None => Ok(actual_height_cm),
        Some(t) if t.is_finite() && t > 0.0 => Ok(t),
        Some(t) => Err(MeasurementError::invalid_target_height(t)),
    }
}

// ============================================================================
// Raw measurements
// ============================================================================

/// Everything known about one body during a pass.
struct Body<'a> {
    vertices: &'a [Point3<f64>],
    frame: &'a BodyFrame,
    skeletal: &'a SkeletalLandmarks,
    levels: &'a BodyLevels,
    surface: &'a SurfaceLandmarks,
    params: &'a MeasureParams,
}

impl Body<'_> {
    fn raw_measurements(&self) -> Vec<(MeasurementKey, Option<f64>)> {
        use MeasurementKey::*;

        let (f, l, s) = (self.frame, self.levels, self.skeletal);
        let ground = |y: f64| f.above_ground(y);

        vec![
            (BodyHeight, Some(f.height_m)),
            (EyeHeight, s.eye.map(|p| ground(p.y))),
            (CervicaleHeight, s.neck.map(|p| ground(p.y))),
            (WaistHeight, Some(ground(l.waist))),
            (HipHeight, Some(ground(l.hip))),
            (
                InsideLegHeight,
                Some(self.surface.crotch.map_or(ground(l.hip), |c| ground(c.y))),
            ),
            (KneeHeight, Some(ground(l.knee))),
            (HeadGirth, self.section(l.head_girth, 0.01)),
            (NeckGirth, self.section(l.neck, 0.01)),
            (BustGirth, self.section(l.bust, 0.02)),
            (UnderbustGirth, self.section(l.underbust, 0.02)),
            (
                WaistGirth,
                l.waist_scan
                    .map(|(_, girth)| girth)
                    .or_else(|| self.section(l.waist, 0.02)),
            ),
            (HipGirth, self.section(l.hip, 0.025)),
            (ThighGirth, self.limb(s.knees, l.thigh, 0.22, 0.02)),
            (KneeGirth, self.limb(s.knees, l.knee, 0.18, 0.015)),
            (CalfGirth, self.limb(s.knees.midpoint(&s.ankles), l.calf, 0.16, 0.02)),
            (AnkleGirth, self.limb(s.ankles, l.ankle, 0.12, 0.012)),
            (
                UpperArmGirth,
                self.limb(s.shoulders.midpoint(&s.elbows), l.upper_arm, 0.13, 0.02),
            ),
            (WristGirth, self.limb(s.wrists, l.wrist, 0.08, 0.01)),
            (ShoulderWidth, self.shoulder_width()),
            (BackWidth, self.back_width()),
            (ChestWidth, self.chest_width()),
            (ArmLength, self.arm_length()),
            (TotalCrotchLength, self.total_crotch_length()),
            (ShoulderSlope, self.shoulder_slope()),
        ]
    }

    fn section(&self, y: f64, thickness: f64) -> Option<f64> {
        section_circumference_with(self.vertices, y, thickness, &self.params.section)
    }

    /// Mean girth of the sides whose limb could be isolated.
    fn limb(
        &self,
        centers: Bilateral<Point3<f64>>,
        y: f64,
        radius: f64,
        thickness: f64,
    ) -> Option<f64> {
        centers
            .map(|center| {
                limb_girth_with(self.vertices, center, y, radius, thickness, &self.params.limb)
            })
            .mean()
    }

    /// Left acromion over the neck to the right acromion.
    fn shoulder_width(&self) -> Option<f64> {
        let left = self.skeletal.acromia.left?;
        let right = self.skeletal.acromia.right?;
        Some(match self.skeletal.neck {
            Some(neck) => distance(&left, &neck) + distance(&neck, &right),
            None => distance(&left, &right),
        })
    }

    fn back_width(&self) -> Option<f64> {
        let axilla = (self.surface.axilla_left.back, self.surface.axilla_right.back);
        let shoulders = (self.skeletal.shoulders.left, self.skeletal.shoulders.right);
        match (axilla, shoulders) {
            ((Some(l), Some(r)), _) => Some(horizontal_distance(&l, &r)),
            (_, (Some(l), Some(r))) => Some((l.x - r.x).abs()),
            _ => None,
        }
    }

    fn chest_width(&self) -> Option<f64> {
        let left = self.surface.axilla_left.front?;
        let right = self.surface.axilla_right.front?;
        Some(horizontal_distance(&left, &right))
    }

    /// Shoulder to elbow to wrist on the first complete side, left first.
    fn arm_length(&self) -> Option<f64> {
        let s = self.skeletal;
        Side::BOTH.into_iter().find_map(|side| {
            let shoulder = s.shoulders.get(side)?;
            let elbow = s.elbows.get(side)?;
            let wrist = s.wrists.get(side)?;
            Some(distance(&shoulder, &elbow) + distance(&elbow, &wrist))
        })
    }

    /// Waist front, down through the crotch, up to the waist back.
    fn total_crotch_length(&self) -> Option<f64> {
        let front = self.surface.waist.front?;
        let back = self.surface.waist.back?;
        let crotch = self.surface.crotch?;
        Some(distance(&front, &crotch) + distance(&crotch, &back))
    }

    /// Angle of the neck-to-left-acromion line below horizontal, in degrees.
    fn shoulder_slope(&self) -> Option<f64> {
        let v = self.skeletal.acromia.left? - self.skeletal.neck?;
        let lateral = Vector2::new(v.x, v.z).norm();
        (lateral > MIN_SLOPE_LATERAL).then(|| v.y.abs().atan2(lateral).to_degrees())
    }

    // ========================================================================
    // Landmark record
    // ========================================================================

    fn landmark_record(&self) -> BTreeMap<LandmarkKey, Option<LandmarkValue>> {
        use LandmarkKey::*;

        let s = self.skeletal;
        let surface = self.surface;
        let point = |p: Option<Point3<f64>>| {
            p.map(|p| LandmarkValue::Point([round_to(p.x, 6), round_to(p.y, 6), round_to(p.z, 6)]))
        };
        let level = |y: f64| Some(LandmarkValue::Level(round_to(y, 5)));

        BTreeMap::from([
            (HeadTop, point(Some(self.frame.head_top))),
            (Cervicale, point(s.neck)),
            (NeckSideLeft, point(average([s.neck, s.acromia.left]))),
            (NeckSideRight, point(average([s.neck, s.acromia.right]))),
            (AcromionLeft, point(s.acromia.left)),
            (AcromionRight, point(s.acromia.right)),
            (AxillaLeftFront, point(surface.axilla_left.front)),
            (AxillaLeftBack, point(surface.axilla_left.back)),
            (AxillaRightFront, point(surface.axilla_right.front)),
            (AxillaRightBack, point(surface.axilla_right.back)),
            (BustPointLeft, point(average([surface.axilla_left.front, surface.waist.front]))),
            (BustPointRight, point(average([surface.axilla_right.front, surface.waist.front]))),
            (WaistLevel, level(self.levels.waist)),
            (HipLevel, level(self.levels.hip)),
            (Crotch, point(surface.crotch)),
            (LateralMalleolusLeft, point(s.ankles.left)),
            (LateralMalleolusRight, point(s.ankles.right)),
        ])
    }
}

// ============================================================================
// Scaling
// ============================================================================

/// Convert raw values to report units, dropping unavailable ones.
///
/// Lengths become centimeters scaled by `scale_factor`; angles pass through.
/// Every value is rounded to two decimals.
pub fn scale_measurements(
    raw: impl IntoIterator<Item = (MeasurementKey, Option<f64>)>,
    scale_factor: f64,
) -> BTreeMap<MeasurementKey, f64> {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let value = value.filter(|v| v.is_finite())?;
            let meta = key.meta();
            let scaled = if meta.unit == Unit::Deg || !meta.scales_with_height {
                value
            } else {
                value * scale_factor * 100.0
            };
            Some((key, round_to(scaled, 2)))
        })
        .collect()
}

/// Distance in the horizontal XZ plane.
fn horizontal_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    Vector2::new(a.x - b.x, a.z - b.z).norm()
}
