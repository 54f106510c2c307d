//! Error types for body measurement with rich diagnostics.
//!
//! Only conditions that make the whole report meaningless are errors. A single
//! landmark or measurement that cannot be resolved is not an error: it is
//! simply left out of the report.
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `BODY-XXXX`:
//! - `BODY-1xxx`: I/O errors (reading and parsing rig files)
//! - `BODY-2xxx`: Rig validation errors (missing mesh, degenerate height)
//! - `BODY-3xxx`: Request errors (target height, person index, parameters)
//!
//! # Example
//!
//! ```
//! use body_metrics::{ErrorCode, MeasurementError};
//!
//! let err = MeasurementError::invalid_target_height(-170.0);
//! assert_eq!(err.code(), ErrorCode::InvalidTargetHeight);
//! assert_eq!(err.code().as_str(), "BODY-3001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasurementError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `BODY-XXXX` where:
/// - 1xxx = I/O errors
/// - 2xxx = Rig validation errors
/// - 3xxx = Request errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// BODY-1001: Failed to read file
    IoRead = 1001,
    /// BODY-1002: Failed to parse rig JSON
    ParseError = 1002,

    // Rig validation errors (2xxx)
    /// BODY-2001: Rig has no mesh vertices
    EmptyMesh = 2001,
    /// BODY-2002: Reconstructed body height is not positive
    InvalidHeight = 2002,

    // Request errors (3xxx)
    /// BODY-3001: Target height is not a positive number
    InvalidTargetHeight = 3001,
    /// BODY-3002: Requested person does not exist in the rig file
    PersonIndexOutOfRange = 3002,
    /// BODY-3003: Measurement parameters are invalid
    InvalidParams = 3003,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `BODY-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "BODY-1001",
            ErrorCode::ParseError => "BODY-1002",
            ErrorCode::EmptyMesh => "BODY-2001",
            ErrorCode::InvalidHeight => "BODY-2002",
            ErrorCode::InvalidTargetHeight => "BODY-3001",
            ErrorCode::PersonIndexOutOfRange => "BODY-3002",
            ErrorCode::InvalidParams => "BODY-3003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that abort a measurement request.
#[derive(Debug, Error, Diagnostic)]
pub enum MeasurementError {
    /// Error reading a rig file.
    #[error("failed to read rig from {path}")]
    #[diagnostic(
        code(body::io::read),
        help("Check that the file exists and is readable. Try: ls -la {}", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing rig JSON.
    #[error("failed to parse rig from {path}: {details}")]
    #[diagnostic(
        code(body::parse::error),
        help(
            "The rig must be a JSON object with `mesh`, `skeleton` and `keypoints`, \
             or an array of such objects."
        )
    )]
    ParseError { path: PathBuf, details: String },

    /// The rig carries no mesh vertices.
    #[error("missing mesh: {details}")]
    #[diagnostic(
        code(body::rig::empty_mesh),
        help("Re-export the rig; `mesh.vertices` must contain at least one point.")
    )]
    EmptyMesh { details: String },

    /// The distance from the lowest to the highest vertex is not positive.
    #[error("invalid height: reconstructed body height is {height_m} m")]
    #[diagnostic(
        code(body::rig::height),
        help("The mesh is flat along the vertical (Y) axis. Check the export's up axis.")
    )]
    InvalidHeight { height_m: f64 },

    /// The caller asked for a target height that is not a positive number.
    #[error("invalid target height: {value} cm (must be a positive number)")]
    #[diagnostic(
        code(body::request::target_height),
        help("Pass the person's real stature in centimeters, or omit it to keep the mesh scale.")
    )]
    InvalidTargetHeight { value: f64 },

    /// The caller asked for a person that is not in the rig file.
    #[error("person index {index} out of range: rig file holds {count} person(s)")]
    #[diagnostic(
        code(body::request::person_index),
        help("Person indices start at 0.")
    )]
    PersonIndexOutOfRange { index: usize, count: usize },

    /// Measurement parameters failed validation or could not be loaded.
    #[error("invalid parameters: {details}")]
    #[diagnostic(code(body::request::params))]
    InvalidParams { details: String },
}

impl MeasurementError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeasurementError::IoRead { .. } => ErrorCode::IoRead,
            MeasurementError::ParseError { .. } => ErrorCode::ParseError,
            MeasurementError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeasurementError::InvalidHeight { .. } => ErrorCode::InvalidHeight,
            MeasurementError::InvalidTargetHeight { .. } => ErrorCode::InvalidTargetHeight,
            MeasurementError::PersonIndexOutOfRange { .. } => ErrorCode::PersonIndexOutOfRange,
            MeasurementError::InvalidParams { .. } => ErrorCode::InvalidParams,
        }
    }

    /// Whether the error was caused by the request rather than by the rig data.
    ///
    /// Callers mapping errors onto client-facing statuses use this to tell a
    /// bad request apart from an unusable reconstruction.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            MeasurementError::InvalidTargetHeight { .. }
                | MeasurementError::PersonIndexOutOfRange { .. }
                | MeasurementError::InvalidParams { .. }
        )
    }

    // Constructor helpers

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeasurementError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MeasurementError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeasurementError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an InvalidHeight error.
    pub fn invalid_height(height_m: f64) -> Self {
        MeasurementError::InvalidHeight { height_m }
    }

    /// Create an InvalidTargetHeight error.
    pub fn invalid_target_height(value: f64) -> Self {
        MeasurementError::InvalidTargetHeight { value }
    }

    /// Create a PersonIndexOutOfRange error.
    pub fn person_index_out_of_range(index: usize, count: usize) -> Self {
        MeasurementError::PersonIndexOutOfRange { index, count }
    }

    /// Create an InvalidParams error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        MeasurementError::InvalidParams {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MeasurementError::empty_mesh("no vertices");
        assert_eq!(err.code(), ErrorCode::EmptyMesh);
        assert_eq!(err.code().as_str(), "BODY-2001");

        let err = MeasurementError::person_index_out_of_range(3, 1);
        assert_eq!(err.code().to_string(), "BODY-3002");
    }

    #[test]
    fn test_error_display() {
        let err = MeasurementError::empty_mesh("Mesh vertices are missing");
        let display = format!("{}", err);
        assert!(display.contains("missing mesh"));
        assert!(display.contains("Mesh vertices are missing"));

        let err = MeasurementError::invalid_height(0.0);
        assert!(format!("{}", err).contains("invalid height"));

        let err = MeasurementError::person_index_out_of_range(2, 1);
        let display = format!("{}", err);
        assert!(display.contains("index 2"));
        assert!(display.contains("1 person"));
    }

    #[test]
    fn test_request_vs_rig_errors() {
        assert!(MeasurementError::invalid_target_height(0.0).is_request_error());
        assert!(MeasurementError::invalid_params("steps").is_request_error());
        assert!(!MeasurementError::empty_mesh("x").is_request_error());
        assert!(!MeasurementError::invalid_height(-1.0).is_request_error());
    }

    #[test]
    fn test_diagnostic_code() {
        let err = MeasurementError::invalid_target_height(f64::NAN);
        let code = Diagnostic::code(&err).map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("body::request::target_height"));
    }
}
