//! Tracing extensions for measurement passes.
//!
//! The library only emits events; installing a subscriber is up to the host.
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=body_metrics=debug shows levels and per-pass summaries.
//! ```
//!
//! # Targets
//!
//! - `body_metrics::timing`: operation start and elapsed time
//! - `body_metrics::rig`: input statistics
//! - `body_metrics::levels`: estimated levels
//! - `body_metrics::measure`: report summaries
//! - `body_metrics::slice`: failed section attempts (trace)

use crate::levels::BodyLevels;
use crate::report::MeasurementReport;
use crate::types::Rig;
use nalgebra::Vector3;
use std::time::Instant;
use tracing::{Span, debug, info};

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// use body_metrics::tracing_ext::OperationTimer;
///
/// fn measure() {
///     let _timer = OperationTimer::new("measure");
///     // ... do work ...
/// } // elapsed time is logged here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("body_operation", operation = name);
        debug!(target: "body_metrics::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer that also records the size of the input.
    pub fn with_context(name: &'static str, vertex_count: usize, keypoint_count: usize) -> Self {
        let span = tracing::info_span!(
            "body_operation",
            operation = name,
            vertices = vertex_count,
            keypoints = keypoint_count
        );
        debug!(
            target: "body_metrics::timing",
            operation = name,
            vertices = vertex_count,
            keypoints = keypoint_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "body_metrics::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log rig statistics at debug level.
pub fn log_rig_stats(rig: &Rig, context: &str) {
    let dims = rig
        .bounds()
        .map_or_else(Vector3::zeros, |(min, max)| max - min);
    debug!(
        target: "body_metrics::rig",
        context = context,
        vertices = rig.vertex_count(),
        faces = rig.face_count(),
        joints = rig.skeleton.joint_count(),
        keypoints = rig.keypoints.len(),
        dimensions = format!("{:.3} x {:.3} x {:.3}", dims.x, dims.y, dims.z),
        "Rig state"
    );
}

/// Log the estimated levels at debug level.
pub fn log_levels(levels: &BodyLevels) {
    debug!(
        target: "body_metrics::levels",
        torso_upper = format!("{:.4}", levels.torso_upper),
        bust = format!("{:.4}", levels.bust),
        waist = format!("{:.4}", levels.waist),
        waist_scanned = levels.waist_scan.is_some(),
        hip = format!("{:.4}", levels.hip),
        knee = format!("{:.4}", levels.knee),
        ankle = format!("{:.4}", levels.ankle),
        "Levels estimated"
    );
}

/// Log a finished report at info level.
pub fn log_report_summary(report: &MeasurementReport) {
    let missing = report.missing();
    info!(
        target: "body_metrics::measure",
        actual_height_cm = report.actual_height_cm,
        scale_factor = report.scale_factor,
        measurements = report.measurements.len(),
        missing = missing.len(),
        "Measurement completed"
    );
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        debug!(target: "body_metrics::measure", missing = ?names, "Unavailable measurements");
    }
}
