//! Compass heading - tilt-compensated azimuth from accelerometer and magnetometer samples
//!
//! This library turns the raw accelerometer and magnetometer samples of a
//! handheld device into a stable compass heading for rotating an on-screen
//! needle. Both sample streams are low-pass filtered, the smoothed vectors are
//! fused into a rotation basis, and the heading is extracted from it and
//! wrapped into `[0, 360)`.
//!
//! # Features
//!
//! - Exponential smoothing of both sensor streams (α = 0.97 by default)
//! - Tilt-compensated heading from a gravity / magnetic-field rotation basis
//! - Pitch, roll and magnetic inclination from the same basis
//! - Degenerate geometry (no field yet, free fall, field parallel to gravity)
//!   reported as a recoverable error instead of a bogus heading
//! - Thread-safe handle with non-blocking heading reads
//! - Channel-based delivery from a sensor callback to a presentation sink
//!
//! # Axis convention
//!
//! Samples are expressed in the device frame: X to the right of the screen,
//! Y toward the top of the screen, Z out of the screen. A device lying face-up
//! reads gravity as `(0, 0, +g)`. Heading 0° means the top edge points at
//! magnetic north; the heading grows clockwise seen from above.
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use compass_heading::{HeadingEstimator, Sample};
//!
//! let mut estimator = HeadingEstimator::new();
//!
//! // Sensor readings from the host, in any interleaving
//! let accelerometer = Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81)); // m/s²
//! let magnetometer = Sample::MagneticField(Vector3::new(0.0, 20.0, -40.0)); // µT
//!
//! for _ in 0..300 {
//!     let _ = estimator.update(accelerometer);
//!     match estimator.update(magnetometer) {
//!         Ok(update) => {
//!             // Animate the needle from -update.previous_heading to -update.new_heading
//!             assert!((0.0..360.0).contains(&update.new_heading));
//!         }
//!         // Not enough signal yet: skip this tick
//!         Err(_) => continue,
//!     }
//! }
//! ```

mod error;
mod estimator;
mod filter;
mod math;
pub mod pipeline;
mod rotation;
mod shared;
mod types;

pub use error::{EstimationError, Result};
pub use estimator::HeadingEstimator;
pub use filter::LowPassFilter;
pub use math::{DEG_TO_RAD, FULL_TURN, RAD_TO_DEG, normalize_heading, shortest_delta};
pub use pipeline::{HeadingSink, PipelineStats};
pub use rotation::RotationMatrix;
pub use shared::SharedEstimator;
pub use types::*;
