//! Anthropometric measurements from reconstructed human body rigs.
//!
//! This crate turns one person's reconstructed rig (a body mesh plus skeleton
//! joints and named keypoints) into a standard set of tailoring measurements:
//! vertical heights, girths, widths, lengths and the shoulder slope, scaled to
//! a known real-world height.
//!
//! # Features
//!
//! - **Slicing**: horizontal cross-sections of the mesh point cloud, convex-hull
//!   circumference with widening and ellipse fallbacks
//! - **Landmarks**: keypoint/joint resolution with coalescing and averaging,
//!   plus vertex-derived points (crotch, armpits, waist front/back)
//! - **Levels**: anatomical heights anchored on landmarks with proportional
//!   fallbacks
//! - **Report**: 25 measurements described by a static registry, landmark
//!   coordinates and level metadata, serializable to JSON
//!
//! # Units and Coordinates
//!
//! **Rigs are in meters with Y pointing up.** X and Z form the horizontal
//! plane; Z points toward the front of the body. Reported lengths are in
//! centimeters, the shoulder slope in degrees.
//!
//! # Quick Start
//!
//! ```no_run
//! use body_metrics::{MeasurementKey, compute_measurements, io::load_rig};
//! use std::path::Path;
//!
//! let rig = load_rig(Path::new("person_1_rig.json"), 0).unwrap();
//! let report = compute_measurements(&rig, Some(172.0)).unwrap();
//!
//! if let Some(waist) = report.get(MeasurementKey::WaistGirth) {
//!     println!("Waist: {waist} cm");
//! }
//! println!("{}", report.to_json_pretty().unwrap());
//! ```
//!
//! # Partial Data
//!
//! Missing landmarks never abort a pass. A measurement that cannot be
//! computed is simply absent from [`MeasurementReport::measurements`]; only
//! an empty mesh, a flat mesh or an invalid target height are errors.
//!
//! # Configuration
//!
//! ```
//! use body_metrics::{MeasureParams, Rig, compute_measurements_with_params};
//!
//! let params = MeasureParams::from_toml("waist_scan_steps = 60").unwrap();
//! let rig = Rig::from_vertices([[0.0, 0.0, 0.0], [0.0, 1.6, 0.0]]);
//! let report = compute_measurements_with_params(&rig, None, &params).unwrap();
//! assert_eq!(report.actual_height_cm, 160.0);
//! ```

// Core types and errors
pub mod error;
pub mod params;
pub mod types;

// Logging
pub mod tracing_ext;

// Engine
pub mod geometry;
pub mod landmarks;
pub mod levels;
pub mod measure;
pub mod registry;
pub mod report;
pub mod slice;
pub mod surface;

// Input
pub mod io;

pub use error::{ErrorCode, MeasureResult, MeasurementError};
pub use params::{LimbParams, MeasureParams, SectionParams};
pub use types::{Keypoint, Rig, RigMesh, Skeleton};

pub use geometry::{convex_hull_2d, ellipse_perimeter, hull_perimeter};
pub use landmarks::{Bilateral, LandmarkSource, Side, SkeletalLandmarks};
pub use levels::{BodyFrame, BodyLevels, estimate_levels};
pub use measure::{compute_all, compute_measurements, compute_measurements_with_params};
pub use registry::{Category, MeasurementKey, MeasurementMeta, Schema, Unit, registry};
pub use report::{LandmarkKey, LandmarkValue, LevelMetadata, MeasurementReport};
pub use slice::{limb_girth, scan_min_circumference, section_circumference, slice_band};
pub use surface::{FrontBack, SurfaceLandmarks};
