use thiserror::Error;

/// Recoverable faults inside the viewport core.
///
/// None of these ever escape the input or tick API. They are built where the
/// condition is detected, logged, and then corrected in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("Invalid zoom level {requested}, clamped to 1")]
    InvalidZoomLevel { requested: i64 },

    #[error("Offset ({x}, {y}) is not pixeloid-aligned")]
    DriftDetected { x: f64, y: f64 },

    #[error("Discarded pan delta ({dx}, {dy}) for deactivated {controller} controller")]
    StaleGestureConflict {
        controller: &'static str,
        dx: f64,
        dy: f64,
    },

    #[error("Recompute of {component} failed: {reason}")]
    RecomputeFailure {
        component: &'static str,
        reason: String,
    },
}
