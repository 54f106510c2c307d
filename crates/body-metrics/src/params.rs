//! Tunable measurement parameters.
//!
//! The defaults reproduce the reference behavior and should rarely need
//! changing. Parameters can be loaded from TOML so that a deployment can
//! adjust sampling density without a rebuild:
//!
//! ```toml
//! waist_scan_steps = 40
//!
//! [section]
//! min_hull_points = 16
//! ```

use crate::error::{MeasureResult, MeasurementError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for horizontal section circumference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionParams {
    /// Minimum band size for a convex-hull attempt.
    ///
    /// Default: `12`
    pub min_hull_points: usize,

    /// Minimum band size for the bounding-box ellipse fallback.
    ///
    /// Default: `4`
    pub min_ellipse_points: usize,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            min_hull_points: 12,
            min_ellipse_points: 4,
        }
    }
}

/// Parameters for radius-filtered limb girths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimbParams {
    /// Minimum band size before radius filtering.
    ///
    /// Default: `6`
    pub min_band_points: usize,

    /// Minimum number of points left after radius filtering.
    ///
    /// Default: `4`
    pub min_limb_points: usize,
}

impl Default for LimbParams {
    fn default() -> Self {
        Self {
            min_band_points: 6,
            min_limb_points: 4,
        }
    }
}

/// Parameters controlling the whole measurement pass.
///
/// # Example
///
/// ```
/// use body_metrics::MeasureParams;
///
/// let params = MeasureParams {
///     waist_scan_steps: 60,
///     ..Default::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureParams {
    /// Section circumference thresholds.
    pub section: SectionParams,

    /// Limb girth thresholds.
    pub limb: LimbParams,

    /// Number of levels sampled when searching for the waist.
    ///
    /// Default: `30`
    pub waist_scan_steps: usize,

    /// Evaluate scan levels on the rayon thread pool.
    ///
    /// Results are identical either way; disable for single-threaded hosts.
    ///
    /// Default: `true`
    pub parallel_scan: bool,
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            section: SectionParams::default(),
            limb: LimbParams::default(),
            waist_scan_steps: 30,
            parallel_scan: true,
        }
    }
}

impl MeasureParams {
    /// Parameters for fully sequential evaluation.
    pub fn sequential() -> Self {
        Self {
            parallel_scan: false,
            ..Default::default()
        }
    }

    /// Check that the parameters can produce a hull.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::InvalidParams`] when a point threshold is
    /// below the three points a hull needs.
    pub fn validate(&self) -> MeasureResult<()> {
        if self.section.min_hull_points < 3 {
            return Err(MeasurementError::invalid_params(format!(
                "section.min_hull_points must be at least 3, got {}",
                self.section.min_hull_points
            )));
        }
        if self.section.min_ellipse_points < 2 {
            return Err(MeasurementError::invalid_params(format!(
                "section.min_ellipse_points must be at least 2, got {}",
                self.section.min_ellipse_points
            )));
        }
        if self.limb.min_limb_points < 3 {
            return Err(MeasurementError::invalid_params(format!(
                "limb.min_limb_points must be at least 3, got {}",
                self.limb.min_limb_points
            )));
        }
        Ok(())
    }

    /// Load parameters from a TOML string. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::InvalidParams`] if the TOML is malformed or
    /// the resulting parameters fail [`validate`](Self::validate).
    pub fn from_toml(toml_str: &str) -> MeasureResult<Self> {
        let params: Self =
            toml::from_str(toml_str).map_err(|e| MeasurementError::invalid_params(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::IoRead`] if the file can't be read, or
    /// [`MeasurementError::InvalidParams`] if its contents are invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> MeasureResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| MeasurementError::io_read(path, e))?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MeasureParams::default();
        assert_eq!(params.section.min_hull_points, 12);
        assert_eq!(params.section.min_ellipse_points, 4);
        assert_eq!(params.limb.min_band_points, 6);
        assert_eq!(params.limb.min_limb_points, 4);
        assert_eq!(params.waist_scan_steps, 30);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let params =
            MeasureParams::from_toml("waist_scan_steps = 50\n[limb]\nmin_band_points = 10\n")
                .unwrap();
        assert_eq!(params.waist_scan_steps, 50);
        assert_eq!(params.limb.min_band_points, 10);
        assert_eq!(params.limb.min_limb_points, 4);
        assert_eq!(params.section, SectionParams::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let params = MeasureParams::sequential();
        let text = params.to_toml().unwrap();
        assert_eq!(MeasureParams::from_toml(&text).unwrap(), params);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let err = MeasureParams::from_toml("[section]\nmin_hull_points = 2\n").unwrap_err();
        assert!(err.to_string().contains("min_hull_points"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(MeasureParams::from_toml("waist_scan_steps = \"many\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = MeasureParams::from_toml_file("/nonexistent/params.toml").unwrap_err();
        assert!(matches!(err, MeasurementError::IoRead { .. }));
    }
}
