//! End-to-end tests for body-metrics.
//!
//! These tests run the full pass from a rig to a report on a synthetic
//! humanoid built from stacked rings of vertices.

use body_metrics::{
    Keypoint, LandmarkKey, MeasureParams, MeasurementError, MeasurementKey, Rig, compute_all,
    compute_measurements, compute_measurements_with_params, registry,
};
use std::f64::consts::{PI, TAU};

// =============================================================================
// Test Rig Generation
// =============================================================================

/// Push an elliptical ring of `n` points at height `y`.
fn push_ring(rig: &mut Rig, cx: f64, cz: f64, y: f64, rx: f64, rz: f64, n: usize) {
    for i in 0..n {
        let a = i as f64 / n as f64 * TAU;
        rig.mesh.vertices.push([cx + rx * a.cos(), y, cz + rz * a.sin()]);
    }
}

/// Push rings every centimeter from `from_cm` to `to_cm` inclusive.
fn push_column(rig: &mut Rig, cx: f64, from_cm: u32, to_cm: u32, rx: f64, rz: f64, n: usize) {
    for i in from_cm..=to_cm {
        push_ring(rig, cx, 0.0, i as f64 * 0.01, rx, rz, n);
    }
}

/// A 1.8 m tall humanoid standing on y = 0 with arms hanging at its sides.
fn create_humanoid() -> Rig {
    let mut rig = Rig::new();

    // Legs
    push_column(&mut rig, 0.1, 0, 85, 0.07, 0.07, 24);
    push_column(&mut rig, -0.1, 0, 85, 0.07, 0.07, 24);
    // Torso, narrowest at y = 1.1
    for i in 85..=145 {
        let y = i as f64 * 0.01;
        let pinch = (1.0 - (y - 1.1).abs() / 0.15).max(0.0);
        push_ring(&mut rig, 0.0, 0.0, y, 0.17 - 0.03 * pinch, 0.11 - 0.02 * pinch, 32);
    }
    // Arms
    push_column(&mut rig, 0.25, 80, 142, 0.04, 0.04, 16);
    push_column(&mut rig, -0.25, 80, 142, 0.04, 0.04, 16);
    // Neck and head
    push_column(&mut rig, 0.0, 145, 155, 0.06, 0.06, 16);
    push_column(&mut rig, 0.0, 155, 180, 0.09, 0.09, 24);

    rig.add_joint("left_hip", [0.1, 0.9, 0.0]);
    rig.add_joint("right_hip", [-0.1, 0.9, 0.0]);
    rig.add_joint("left_knee", [0.1, 0.5, 0.0]);
    rig.add_joint("right_knee", [-0.1, 0.5, 0.0]);
    rig.add_joint("left_ankle", [0.1, 0.08, 0.0]);
    rig.add_joint("right_ankle", [-0.1, 0.08, 0.0]);
    // Superseded by the keypoint below.
    rig.add_joint("neck", [0.0, 1.4, 0.0]);

    for (name, position) in [
        ("neck", [0.0, 1.5, 0.0]),
        ("left_shoulder", [0.2, 1.42, 0.0]),
        ("right_shoulder", [-0.2, 1.42, 0.0]),
        ("left_elbow", [0.25, 1.12, 0.0]),
        ("right_elbow", [-0.25, 1.12, 0.0]),
        ("left_wrist", [0.25, 0.85, 0.0]),
        ("right_wrist", [-0.25, 0.85, 0.0]),
        ("left_eye", [0.03, 1.7, 0.08]),
        ("right_eye", [-0.03, 1.7, 0.08]),
        ("nose", [0.0, 1.68, 0.09]),
    ] {
        rig.keypoints.push(Keypoint::new(name, position));
    }
    rig
}

fn without_keypoints(mut rig: Rig, names: &[&str]) -> Rig {
    rig.keypoints
        .retain(|k| !names.contains(&k.name.as_deref().unwrap_or_default()));
    rig
}

// =============================================================================
// Height and Scaling
// =============================================================================

#[test]
fn test_humanoid_height_and_unit_scale() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();

    assert!((report.actual_height_cm - 180.0).abs() < 0.01);
    assert_eq!(report.scale_factor, 1.0);
    assert_eq!(report.target_height_cm, report.actual_height_cm);
    assert_eq!(report.get(MeasurementKey::BodyHeight), Some(report.actual_height_cm));
    assert!(report.get(MeasurementKey::ShoulderWidth).unwrap() > 0.0);
}

#[test]
fn test_doubling_target_doubles_lengths() {
    let rig = create_humanoid();
    let base = compute_measurements(&rig, None).unwrap();
    let doubled = compute_measurements(&rig, Some(2.0 * base.actual_height_cm)).unwrap();

    assert!((doubled.scale_factor - 2.0).abs() < 1e-4);
    assert_eq!(base.measurements.len(), doubled.measurements.len());

    for (key, value) in &base.measurements {
        let scaled = doubled.measurements[key];
        if key.meta().scales_with_height {
            assert!(
                (scaled - 2.0 * value).abs() <= 0.02,
                "{key}: {scaled} vs 2 x {value}"
            );
        } else {
            assert_eq!(scaled, *value, "{key} must not scale");
        }
    }
}

#[test]
fn test_target_height_sets_body_height() {
    let report = compute_measurements(&create_humanoid(), Some(165.0)).unwrap();
    assert_eq!(report.target_height_cm, 165.0);
    assert_eq!(report.get(MeasurementKey::BodyHeight), Some(165.0));
    assert!((report.scale_factor - 165.0 / 180.0).abs() < 1e-4);
}

// =============================================================================
// Measurements
// =============================================================================

#[test]
fn test_humanoid_measurements_available() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();

    for key in [
        MeasurementKey::EyeHeight,
        MeasurementKey::CervicaleHeight,
        MeasurementKey::WaistHeight,
        MeasurementKey::HipHeight,
        MeasurementKey::InsideLegHeight,
        MeasurementKey::KneeHeight,
        MeasurementKey::HeadGirth,
        MeasurementKey::NeckGirth,
        MeasurementKey::BustGirth,
        MeasurementKey::WaistGirth,
        MeasurementKey::HipGirth,
        MeasurementKey::ThighGirth,
        MeasurementKey::KneeGirth,
        MeasurementKey::CalfGirth,
        MeasurementKey::AnkleGirth,
        MeasurementKey::WristGirth,
        MeasurementKey::ShoulderWidth,
        MeasurementKey::BackWidth,
        MeasurementKey::ChestWidth,
        MeasurementKey::ArmLength,
        MeasurementKey::ShoulderSlope,
    ] {
        let value = report.get(key).unwrap_or_else(|| panic!("{key} missing"));
        assert!(value > 0.0, "{key} = {value}");
    }
}

#[test]
fn test_humanoid_known_values() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();

    // Straight landmark differences.
    assert!((report.get(MeasurementKey::CervicaleHeight).unwrap() - 150.0).abs() < 0.01);
    assert!((report.get(MeasurementKey::HipHeight).unwrap() - 90.0).abs() < 0.01);
    assert!((report.get(MeasurementKey::KneeHeight).unwrap() - 50.0).abs() < 0.01);
    assert!((report.get(MeasurementKey::EyeHeight).unwrap() - 169.33).abs() < 0.01);
    let arm = (0.05f64.hypot(0.3) + 0.27) * 100.0;
    assert!((report.get(MeasurementKey::ArmLength).unwrap() - arm).abs() < 0.01);

    // Isolated cylinders: head r = 0.09, neck r = 0.06.
    let head = report.get(MeasurementKey::HeadGirth).unwrap();
    assert!((head - 200.0 * PI * 0.09).abs() < 1.0, "head {head}");
    let neck = report.get(MeasurementKey::NeckGirth).unwrap();
    assert!((neck - 200.0 * PI * 0.06).abs() < 1.0, "neck {neck}");

    // Shoulders slope down 8 cm over 20 cm.
    let slope = report.get(MeasurementKey::ShoulderSlope).unwrap();
    assert!((slope - (0.08f64).atan2(0.2).to_degrees()).abs() < 0.01);
}

#[test]
fn test_waist_level_within_torso() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();
    // The scan samples [0.93, 1.37] in 30 steps and finds the pinch.
    let waist = report.metadata.waist_level_y;
    assert!((waist - 1.1).abs() < 0.02, "waist level {waist}");
    assert!(
        report.get(MeasurementKey::WaistGirth).unwrap()
            < report.get(MeasurementKey::HipGirth).unwrap()
    );
    assert_eq!(report.metadata.hip_level_y, 0.9);
    assert!(report.metadata.bust_level_y > report.metadata.waist_level_y);
}

#[test]
fn test_missing_wrists_only_drop_wrist_measurements() {
    let full = compute_measurements(&create_humanoid(), None).unwrap();
    let rig = without_keypoints(create_humanoid(), &["left_wrist", "right_wrist"]);
    let partial = compute_measurements(&rig, None).unwrap();

    assert!(full.get(MeasurementKey::WristGirth).is_some());
    assert!(partial.get(MeasurementKey::WristGirth).is_none());
    assert!(partial.get(MeasurementKey::ArmLength).is_none());

    for (key, value) in &partial.measurements {
        assert_eq!(full.get(*key), Some(*value), "{key} changed");
    }
}

#[test]
fn test_landmarks_recorded() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();
    assert_eq!(report.landmarks.len(), LandmarkKey::ALL.len());

    let head_top = report.landmark(LandmarkKey::HeadTop).unwrap().as_point().unwrap();
    assert!((head_top[1] - 1.8).abs() < 1e-6);
    let cervicale = report.landmark(LandmarkKey::Cervicale).unwrap().as_point().unwrap();
    assert_eq!(cervicale, [0.0, 1.5, 0.0]);
    let malleolus = report
        .landmark(LandmarkKey::LateralMalleolusRight)
        .unwrap()
        .as_point()
        .unwrap();
    assert_eq!(malleolus, [-0.1, 0.08, 0.0]);
    assert_eq!(
        report.landmark(LandmarkKey::HipLevel).unwrap().as_level(),
        Some(0.9)
    );
    assert!(report.landmark(LandmarkKey::AxillaLeftFront).is_some());
    assert!(report.landmark(LandmarkKey::Crotch).is_some());
}

#[test]
fn test_mesh_only_rig_uses_proportions() {
    let mut rig = create_humanoid();
    rig.keypoints.clear();
    rig.skeleton = Default::default();

    let report = compute_measurements(&rig, None).unwrap();
    assert!((report.metadata.hip_level_y - 0.81).abs() < 1e-9);
    assert!((report.get(MeasurementKey::KneeHeight).unwrap() - 46.8).abs() < 0.01);
    // Limb girths and skeletal lengths need landmarks.
    for key in [
        MeasurementKey::ThighGirth,
        MeasurementKey::ArmLength,
        MeasurementKey::ShoulderWidth,
        MeasurementKey::ShoulderSlope,
        MeasurementKey::EyeHeight,
        MeasurementKey::CervicaleHeight,
    ] {
        assert!(report.get(key).is_none(), "{key} should be absent");
    }
    assert!(report.get(MeasurementKey::HipGirth).is_some());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_idempotent() {
    let rig = create_humanoid();
    let first = compute_measurements(&rig, Some(172.0)).unwrap();
    let second = compute_measurements(&rig, Some(172.0)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sequential_matches_parallel() {
    let rig = create_humanoid();
    let parallel = compute_measurements_with_params(&rig, None, &MeasureParams::default()).unwrap();
    let sequential =
        compute_measurements_with_params(&rig, None, &MeasureParams::sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_compute_all_independent_results() {
    let rigs = vec![create_humanoid(), Rig::new(), create_humanoid()];
    let results = compute_all(&rigs, None, &MeasureParams::default());

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(MeasurementError::EmptyMesh { .. })));
    assert_eq!(results[0].as_ref().ok(), results[2].as_ref().ok());
}

// =============================================================================
// Errors and Schema
// =============================================================================

#[test]
fn test_fatal_errors() {
    let err = compute_measurements(&Rig::new(), None).unwrap_err();
    assert!(matches!(err, MeasurementError::EmptyMesh { .. }));

    let flat = Rig::from_vertices([[0.0, 1.0, 0.0], [1.0, 1.0, 1.0]]);
    let err = compute_measurements(&flat, None).unwrap_err();
    assert!(matches!(err, MeasurementError::InvalidHeight { .. }));

    for target in [0.0, -170.0, f64::NAN] {
        let err = compute_measurements(&create_humanoid(), Some(target)).unwrap_err();
        assert!(matches!(err, MeasurementError::InvalidTargetHeight { .. }));
        assert!(err.is_request_error());
    }
}

#[test]
fn test_schema_complete() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();
    assert_eq!(report.schema.len(), 25);
    assert_eq!(&report.schema, registry());
    for key in report.measurements.keys() {
        assert!(report.schema.contains_key(key));
    }
}

#[test]
fn test_report_json() {
    let report = compute_measurements(&create_humanoid(), None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    for field in [
        "actual_height_cm",
        "target_height_cm",
        "scale_factor",
        "measurements",
        "landmarks",
        "metadata",
        "schema",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["schema"]["shoulder_slope"]["unit"], "deg");
    assert!(json["measurements"]["waist_girth"].is_number());
    assert!(json["landmarks"]["waist_level"].is_number());
}
