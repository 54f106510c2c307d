//! Measurement metadata registry.
//!
//! The registry is the single source of truth for which measurements exist,
//! their units and whether they scale with body height. It is built once per
//! process and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Identifier of a measurement.
///
/// Variants are declared in registry order, so ordered maps keyed by
/// `MeasurementKey` list measurements the way the registry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKey {
    BodyHeight,
    EyeHeight,
    CervicaleHeight,
    WaistHeight,
    HipHeight,
    InsideLegHeight,
    KneeHeight,
    HeadGirth,
    NeckGirth,
    BustGirth,
    UnderbustGirth,
    WaistGirth,
    HipGirth,
    ThighGirth,
    KneeGirth,
    CalfGirth,
    AnkleGirth,
    UpperArmGirth,
    WristGirth,
    ShoulderWidth,
    BackWidth,
    ChestWidth,
    ArmLength,
    TotalCrotchLength,
    ShoulderSlope,
}

impl MeasurementKey {
    /// Every key, in registry order.
    pub const ALL: [MeasurementKey; 25] = [
        MeasurementKey::BodyHeight,
        MeasurementKey::EyeHeight,
        MeasurementKey::CervicaleHeight,
        MeasurementKey::WaistHeight,
        MeasurementKey::HipHeight,
        MeasurementKey::InsideLegHeight,
        MeasurementKey::KneeHeight,
        MeasurementKey::HeadGirth,
        MeasurementKey::NeckGirth,
        MeasurementKey::BustGirth,
        MeasurementKey::UnderbustGirth,
        MeasurementKey::WaistGirth,
        MeasurementKey::HipGirth,
        MeasurementKey::ThighGirth,
        MeasurementKey::KneeGirth,
        MeasurementKey::CalfGirth,
        MeasurementKey::AnkleGirth,
        MeasurementKey::UpperArmGirth,
        MeasurementKey::WristGirth,
        MeasurementKey::ShoulderWidth,
        MeasurementKey::BackWidth,
        MeasurementKey::ChestWidth,
        MeasurementKey::ArmLength,
        MeasurementKey::TotalCrotchLength,
        MeasurementKey::ShoulderSlope,
    ];

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::BodyHeight => "body_height",
            MeasurementKey::EyeHeight => "eye_height",
            MeasurementKey::CervicaleHeight => "cervicale_height",
            MeasurementKey::WaistHeight => "waist_height",
            MeasurementKey::HipHeight => "hip_height",
            MeasurementKey::InsideLegHeight => "inside_leg_height",
            MeasurementKey::KneeHeight => "knee_height",
            MeasurementKey::HeadGirth => "head_girth",
            MeasurementKey::NeckGirth => "neck_girth",
            MeasurementKey::BustGirth => "bust_girth",
            MeasurementKey::UnderbustGirth => "underbust_girth",
            MeasurementKey::WaistGirth => "waist_girth",
            MeasurementKey::HipGirth => "hip_girth",
            MeasurementKey::ThighGirth => "thigh_girth",
            MeasurementKey::KneeGirth => "knee_girth",
            MeasurementKey::CalfGirth => "calf_girth",
            MeasurementKey::AnkleGirth => "ankle_girth",
            MeasurementKey::UpperArmGirth => "upper_arm_girth",
            MeasurementKey::WristGirth => "wrist_girth",
            MeasurementKey::ShoulderWidth => "shoulder_width",
            MeasurementKey::BackWidth => "back_width",
            MeasurementKey::ChestWidth => "chest_width",
            MeasurementKey::ArmLength => "arm_length",
            MeasurementKey::TotalCrotchLength => "total_crotch_length",
            MeasurementKey::ShoulderSlope => "shoulder_slope",
        }
    }

    /// Registry entry for this key.
    pub const fn meta(&self) -> MeasurementMeta {
        use MeasurementKey::*;
        match self {
            BodyHeight | EyeHeight | CervicaleHeight | WaistHeight | HipHeight | InsideLegHeight
            | KneeHeight => MeasurementMeta::new(Unit::Cm, true, Category::Vertical),
            HeadGirth | NeckGirth | BustGirth | UnderbustGirth | WaistGirth | HipGirth
            | ThighGirth | KneeGirth | CalfGirth | AnkleGirth | UpperArmGirth | WristGirth => {
                MeasurementMeta::new(Unit::Cm, true, Category::Girth)
            }
            ShoulderWidth | BackWidth | ChestWidth => {
                MeasurementMeta::new(Unit::Cm, true, Category::Width)
            }
            ArmLength | TotalCrotchLength => {
                MeasurementMeta::new(Unit::Cm, true, Category::Special)
            }
            ShoulderSlope => MeasurementMeta::new(Unit::Deg, false, Category::Angle),
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown measurement name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown measurement key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for MeasurementKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_owned()))
    }
}

/// Unit of a measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Centimeters.
    Cm,
    /// Degrees.
    Deg,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Cm => "cm",
            Unit::Deg => "deg",
        }
    }
}

/// Measurement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vertical,
    Girth,
    Width,
    Special,
    Angle,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vertical => "vertical",
            Category::Girth => "girth",
            Category::Width => "width",
            Category::Special => "special",
            Category::Angle => "angle",
        }
    }
}

/// Registry entry describing one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementMeta {
    pub unit: Unit,
    pub category: Category,
    /// Whether the value is multiplied by the height scale factor.
    pub scales_with_height: bool,
}

impl MeasurementMeta {
    const fn new(unit: Unit, scales_with_height: bool, category: Category) -> Self {
        Self {
            unit,
            category,
            scales_with_height,
        }
    }
}

/// The registry as serialized into every report.
pub type Schema = BTreeMap<MeasurementKey, MeasurementMeta>;

static REGISTRY: LazyLock<Schema> =
    LazyLock::new(|| MeasurementKey::ALL.into_iter().map(|k| (k, k.meta())).collect());

/// The process-wide measurement registry.
pub fn registry() -> &'static Schema {
    &REGISTRY
}

/// Look up a measurement by wire name.
pub fn lookup(name: &str) -> Option<(MeasurementKey, &'static MeasurementMeta)> {
    let key = name.parse::<MeasurementKey>().ok()?;
    registry().get(&key).map(|meta| (key, meta))
}

/// A copy of the full registry for embedding in a report.
pub fn schema() -> Schema {
    registry().clone()
}
