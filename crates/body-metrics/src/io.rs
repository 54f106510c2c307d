//! Rig file loading.
//!
//! A rig file is JSON holding either a single rig object or an array of rigs,
//! one per detected person. Reconstruction exports one file per person named
//! `person_<n>_rig.json` with `n` starting at 1; [`load_rig_dir`] collects
//! such a directory in person order.

use crate::error::{MeasureResult, MeasurementError};
use crate::types::Rig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parse rigs from a JSON string.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`MeasurementError::ParseError`] if the text is not a rig object or
/// an array of rig objects.
/// The error details keep serde_json's message with its line and column.
pub fn rigs_from_json_str(json: &str, origin: impl Into<PathBuf>) -> MeasureResult<Vec<Rig>> {
    // Branch on the top-level shape so a malformed rig reports its own error.
    let parsed = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Rig>>(json)
    } else {
        serde_json::from_str::<Rig>(json).map(|rig| vec![rig])
    };
    parsed.map_err(|e| MeasurementError::parse_error(origin, e.to_string()))
}

/// Load every rig from a JSON file.
///
/// # Errors
///
/// Returns [`MeasurementError::IoRead`] if the file can't be read and
/// [`MeasurementError::ParseError`] if it isn't valid rig JSON.
pub fn load_rigs(path: &Path) -> MeasureResult<Vec<Rig>> {
    info!("Loading rigs from {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|e| MeasurementError::io_read(path, e))?;
    let rigs = rigs_from_json_str(&text, path)?;

    for (index, rig) in rigs.iter().enumerate() {
        debug!(
            "Person {}: {} vertices, {} joints, {} keypoints",
            index,
            rig.vertex_count(),
            rig.skeleton.joint_count(),
            rig.keypoints.len()
        );
        if rig.vertex_count() == 0 {
            warn!("Person {} in {:?} has no mesh vertices", index, path);
        }
    }
    info!("Loaded {} rig(s)", rigs.len());
    Ok(rigs)
}

/// Load the rig of one person from a file.
///
/// # Errors
///
/// As [`load_rigs`], plus [`MeasurementError::PersonIndexOutOfRange`] if the
/// file holds fewer than `person_index + 1` rigs.
pub fn load_rig(path: &Path, person_index: usize) -> MeasureResult<Rig> {
    let rigs = load_rigs(path)?;
    select_person(rigs, person_index)
}

/// Take the rig at `person_index` (zero-based).
///
/// # Errors
///
/// Returns [`MeasurementError::PersonIndexOutOfRange`] if there is no such
/// person.
pub fn select_person(rigs: Vec<Rig>, person_index: usize) -> MeasureResult<Rig> {
    let count = rigs.len();
    rigs.into_iter()
        .nth(person_index)
        .ok_or_else(|| MeasurementError::person_index_out_of_range(person_index, count))
}

/// File name of the exported rig for a zero-based person index.
pub fn rig_file_name(person_index: usize) -> String {
    format!("person_{}_rig.json", person_index + 1)
}

/// Load `person_1_rig.json`, `person_2_rig.json`, ... from a directory,
/// stopping at the first missing file.
///
/// # Errors
///
/// Returns [`MeasurementError::IoRead`] if the directory holds no
/// `person_1_rig.json`, or the first load error encountered.
pub fn load_rig_dir(dir: &Path) -> MeasureResult<Vec<Rig>> {
    let mut rigs = Vec::new();
    loop {
        let path = dir.join(rig_file_name(rigs.len()));
        if !path.is_file() {
            break;
        }
        let mut loaded = load_rigs(&path)?;
        if loaded.is_empty() {
            return Err(MeasurementError::parse_error(path, "empty rig array"));
        }
        if loaded.len() > 1 {
            warn!("{:?} holds {} rigs, using the first", path, loaded.len());
        }
        rigs.push(loaded.swap_remove(0));
    }

    if rigs.is_empty() {
        return Err(MeasurementError::io_read(
            dir.join(rig_file_name(0)),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }
    Ok(rigs)
}

/// Load rigs from a file, or from a directory of per-person rig files.
///
/// # Errors
///
/// See [`load_rigs`] and [`load_rig_dir`].
pub fn load_rigs_from(path: &Path) -> MeasureResult<Vec<Rig>> {
    if path.is_dir() {
        load_rig_dir(path)
    } else {
        load_rigs(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIG: &str = r#"{"mesh": {"vertices": [[0, 0, 0], [0, 1.7, 0]]}}"#;

    #[test]
    fn test_single_object() {
        let rigs = rigs_from_json_str(RIG, "inline").unwrap();
        assert_eq!(rigs.len(), 1);
        assert_eq!(rigs[0].vertex_count(), 2);
    }

    #[test]
    fn test_array() {
        let json = format!("[{RIG}, {{}}]");
        let rigs = rigs_from_json_str(&json, "inline").unwrap();
        assert_eq!(rigs.len(), 2);
        assert_eq!(rigs[1].vertex_count(), 0);
    }

    #[test]
    fn test_invalid_json() {
        let err = rigs_from_json_str("[1, 2", "broken.json").unwrap_err();
        assert!(matches!(err, MeasurementError::ParseError { .. }));
        assert!(err.to_string().contains("broken.json"));

        let err = rigs_from_json_str("42", "number.json").unwrap_err();
        assert!(matches!(err, MeasurementError::ParseError { .. }));
    }

    #[test]
    fn test_parse_error_keeps_position() {
        let json = r#"{"mesh": {"vertices": [[0, 0, 0], [0, 1.7]]}}"#;
        let err = rigs_from_json_str(json, "bad.json").unwrap_err();
        let MeasurementError::ParseError { details, .. } = &err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(details.contains("line 1 column"), "{details}");
        assert!(details.contains("invalid length 2"), "{details}");
        assert!(!details.contains("untagged"), "{details}");

        // Same inside an array of rigs.
        let err = rigs_from_json_str(&format!("[{RIG},\n{json}]"), "bad.json").unwrap_err();
        assert!(err.to_string().contains("line 2 column"), "{err}");
    }

    #[test]
    fn test_quad_faces_still_measure() {
        let json = r#"{"mesh": {
            "vertices": [[0, 0, 0], [0.1, 0.9, 0], [0, 1.7, 0]],
            "faces": [[0, 1, 2, 0], [2, 1, 0, -1]]
        }}"#;
        let rigs = rigs_from_json_str(json, "quad.json").unwrap();
        assert_eq!(rigs[0].face_count(), 2);
        let report = crate::compute_measurements(&rigs[0], None).unwrap();
        assert_eq!(report.actual_height_cm, 170.0);
    }

    #[test]
    fn test_select_person() {
        let rigs = rigs_from_json_str(&format!("[{RIG}, {RIG}]"), "inline").unwrap();
        assert!(select_person(rigs.clone(), 1).is_ok());
        let err = select_person(rigs, 2).unwrap_err();
        assert!(matches!(
            err,
            MeasurementError::PersonIndexOutOfRange { index: 2, count: 2 }
        ));
    }

    #[test]
    fn test_rig_file_name() {
        assert_eq!(rig_file_name(0), "person_1_rig.json");
        assert_eq!(rig_file_name(2), "person_3_rig.json");
    }
}
