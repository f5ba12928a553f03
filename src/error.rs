//! Error types for the compass heading estimator

use thiserror::Error;

/// Errors produced while estimating a heading
///
/// Every variant is recoverable: the caller skips the current tick and waits
/// for the next sample.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationError {
    /// The smoothed gravity and magnetic vectors do not define a rotation
    ///
    /// Raised while either estimate is still (near) zero, while the device is
    /// in free fall, or when the magnetic field is parallel to gravity.
    #[error("degenerate orientation: gravity and magnetic estimates do not span a rotation basis")]
    DegenerateOrientation,
}

pub type Result<T> = core::result::Result<T, EstimationError>;
