//! Measurement report.
//!
//! The report is the serialized output of a measurement pass. Its JSON shape:
//!
//! ```json
//! {
//!   "actual_height_cm": 179.5,
//!   "target_height_cm": 172.0,
//!   "scale_factor": 0.9582,
//!   "measurements": { "body_height": 172.0, "waist_girth": 81.23, ... },
//!   "landmarks": { "head_top": [0.0, 1.79, 0.02], "waist_level": 1.05, "crotch": null, ... },
//!   "metadata": { "waist_level_y": 1.05, "hip_level_y": 0.9, "bust_level_y": 1.3 },
//!   "schema": {
//!     "body_height": { "unit": "cm", "category": "vertical", "scales_with_height": true },
//!     ...
//!   }
//! }
//! ```

use crate::registry::{MeasurementKey, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a reported landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKey {
    HeadTop,
    Cervicale,
    NeckSideLeft,
    NeckSideRight,
    AcromionLeft,
    AcromionRight,
    AxillaLeftFront,
    AxillaLeftBack,
    AxillaRightFront,
    AxillaRightBack,
    BustPointLeft,
    BustPointRight,
    WaistLevel,
    HipLevel,
    Crotch,
    LateralMalleolusLeft,
    LateralMalleolusRight,
}

impl LandmarkKey {
    /// Every key, in report order.
    pub const ALL: [LandmarkKey; 17] = [
        LandmarkKey::HeadTop,
        LandmarkKey::Cervicale,
        LandmarkKey::NeckSideLeft,
        LandmarkKey::NeckSideRight,
        LandmarkKey::AcromionLeft,
        LandmarkKey::AcromionRight,
        LandmarkKey::AxillaLeftFront,
        LandmarkKey::AxillaLeftBack,
        LandmarkKey::AxillaRightFront,
        LandmarkKey::AxillaRightBack,
        LandmarkKey::BustPointLeft,
        LandmarkKey::BustPointRight,
        LandmarkKey::WaistLevel,
        LandmarkKey::HipLevel,
        LandmarkKey::Crotch,
        LandmarkKey::LateralMalleolusLeft,
        LandmarkKey::LateralMalleolusRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkKey::HeadTop => "head_top",
            LandmarkKey::Cervicale => "cervicale",
            LandmarkKey::NeckSideLeft => "neck_side_left",
            LandmarkKey::NeckSideRight => "neck_side_right",
            LandmarkKey::AcromionLeft => "acromion_left",
            LandmarkKey::AcromionRight => "acromion_right",
            LandmarkKey::AxillaLeftFront => "axilla_left_front",
            LandmarkKey::AxillaLeftBack => "axilla_left_back",
            LandmarkKey::AxillaRightFront => "axilla_right_front",
            LandmarkKey::AxillaRightBack => "axilla_right_back",
            LandmarkKey::BustPointLeft => "bust_point_left",
            LandmarkKey::BustPointRight => "bust_point_right",
            LandmarkKey::WaistLevel => "waist_level",
            LandmarkKey::HipLevel => "hip_level",
            LandmarkKey::Crotch => "crotch",
            LandmarkKey::LateralMalleolusLeft => "lateral_malleolus_left",
            LandmarkKey::LateralMalleolusRight => "lateral_malleolus_right",
        }
    }
}

impl fmt::Display for LandmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported landmark: a point, or a bare level for `waist_level` and
/// `hip_level`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LandmarkValue {
    Point([f64; 3]),
    Level(f64),
}

impl LandmarkValue {
    /// The point, if this is one.
    pub fn as_point(&self) -> Option<[f64; 3]> {
        match self {
            LandmarkValue::Point(p) => Some(*p),
            LandmarkValue::Level(_) => None,
        }
    }

    /// The level, if this is one.
    pub fn as_level(&self) -> Option<f64> {
        match self {
            LandmarkValue::Level(y) => Some(*y),
            LandmarkValue::Point(_) => None,
        }
    }
}

/// Key levels of the pass, in mesh units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    pub waist_level_y: f64,
    pub hip_level_y: f64,
    pub bust_level_y: f64,
}

/// Result of measuring one rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Reconstructed height.
    pub actual_height_cm: f64,
    /// Height the measurements were scaled to.
    pub target_height_cm: f64,
    /// `target_height_cm / actual_height_cm`.
    pub scale_factor: f64,
    /// Available measurements. Unresolvable keys are absent.
    pub measurements: BTreeMap<MeasurementKey, f64>,
    /// Every landmark key; unresolved landmarks are `null`.
    pub landmarks: BTreeMap<LandmarkKey, Option<LandmarkValue>>,
    pub metadata: LevelMetadata,
    /// The full measurement registry.
    pub schema: Schema,
}

impl MeasurementReport {
    /// Value of a measurement, if it was available.
    pub fn get(&self, key: MeasurementKey) -> Option<f64> {
        self.measurements.get(&key).copied()
    }

    /// A resolved landmark.
    pub fn landmark(&self, key: LandmarkKey) -> Option<LandmarkValue> {
        self.landmarks.get(&key).copied().flatten()
    }

    /// Keys present in the registry but missing from this report.
    pub fn missing(&self) -> Vec<MeasurementKey> {
        self.schema
            .keys()
            .filter(|k| !self.measurements.contains_key(*k))
            .copied()
            .collect()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
