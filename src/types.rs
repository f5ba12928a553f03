//! Core types and settings for the compass heading estimator

use nalgebra::Vector3;

use crate::math::{normalize_heading, shortest_delta};

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Source of a raw sensor sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Accelerometer, measuring the gravity reaction in m/s²
    Accelerometer,
    /// Magnetometer, measuring the ambient magnetic field in µT
    MagneticField,
}

/// A single raw 3-axis reading in the device-body frame
///
/// The device frame is fixed: X points to the right of the screen, Y toward
/// the top of the screen and Z out of the screen. A device lying face-up on a
/// table reports `Accelerometer((0, 0, +g))`.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{Sample, SensorKind};
///
/// let sample = Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81));
/// assert_eq!(sample.kind(), SensorKind::Accelerometer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Accelerometer reading in m/s²
    Accelerometer(Vector3<f32>),
    /// Magnetometer reading in µT
    MagneticField(Vector3<f32>),
}

impl Sample {
    /// Which sensor produced this sample
    pub fn kind(&self) -> SensorKind {
        match self {
            Sample::Accelerometer(_) => SensorKind::Accelerometer,
            Sample::MagneticField(_) => SensorKind::MagneticField,
        }
    }

    /// The raw vector carried by this sample
    pub fn vector(&self) -> Vector3<f32> {
        match self {
            Sample::Accelerometer(v) | Sample::MagneticField(v) => *v,
        }
    }
}

/// A sample as delivered by the host, with an optional hardware timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    /// The tagged reading
    pub sample: Sample,
    /// Hardware timestamp in nanoseconds, when the host provides one
    pub timestamp_ns: Option<u64>,
}

impl SensorEvent {
    pub fn new(sample: Sample) -> Self {
        Self {
            sample,
            timestamp_ns: None,
        }
    }

    pub fn with_timestamp(sample: Sample, timestamp_ns: u64) -> Self {
        Self {
            sample,
            timestamp_ns: Some(timestamp_ns),
        }
    }
}

impl From<Sample> for SensorEvent {
    fn from(sample: Sample) -> Self {
        Self::new(sample)
    }
}

/// Heading transition produced by a successful update
///
/// Both values are in degrees within `[0, 360)`. The pair is handed to the
/// presentation layer as-is: no shortest-path resolution is applied, so a
/// transition from 359° to 1° reports a raw sweep of -358°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingUpdate {
    /// Heading before this update
    pub previous_heading: f32,
    /// Heading computed from this update
    pub new_heading: f32,
}

impl HeadingUpdate {
    /// Raw signed rotation `new_heading - previous_heading`, in `(-360, 360)`
    pub fn sweep(&self) -> f32 {
        self.new_heading - self.previous_heading
    }

    /// Shortest signed rotation between the two headings, in `(-180, 180]`
    ///
    /// Presentation layers that want to avoid long sweeps across north can use
    /// this instead of [`HeadingUpdate::sweep`]. The estimator never applies it.
    pub fn shortest_sweep(&self) -> f32 {
        shortest_delta(self.previous_heading, self.new_heading)
    }

    /// Start and end angles for rotating a compass needle image
    ///
    /// The needle turns opposite to the device so that it keeps pointing at
    /// magnetic north, hence both angles are negated.
    pub fn needle_rotation(&self) -> (f32, f32) {
        (-self.previous_heading, -self.new_heading)
    }
}

/// Device orientation angles in degrees
///
/// - `azimuth`: heading around the vertical axis, `[0, 360)`, clockwise from north
/// - `pitch`: rotation around the device X axis, `[-90, 90]`
/// - `roll`: rotation around the device Y axis, `(-180, 180]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub azimuth: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    pub(crate) fn from_radians(azimuth: f32, pitch: f32, roll: f32) -> Self {
        Self {
            azimuth: normalize_heading(azimuth.to_degrees()),
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
        }
    }
}

/// Lifecycle of the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorState {
    /// At least one sensor kind has not delivered a sample yet
    #[default]
    Uninitialized,
    /// Both sensor kinds have delivered samples; rotations can be built
    Tracking,
}

/// Heading estimator settings
///
/// # Example
/// ```
/// use compass_heading::{EstimatorSettings, HeadingEstimator};
///
/// let settings = EstimatorSettings {
///     smoothing_factor: 0.9,   // more responsive, more jitter
///     ..Default::default()
/// };
/// let estimator = HeadingEstimator::with_settings(settings);
/// assert_eq!(estimator.settings().smoothing_factor, 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorSettings {
    /// Weight of the previous estimate in the exponential moving average (0.97)
    ///
    /// Each new sample contributes `1 - smoothing_factor`. Higher values give a
    /// steadier needle that follows orientation changes more slowly.
    pub smoothing_factor: f32,
    /// Squared gravity magnitude below which the device is treated as in free
    /// fall and no rotation is built, in (m/s²)²
    pub free_fall_gravity_squared: f32,
    /// Minimum magnitude of `magnetic × gravity` before normalization
    ///
    /// Rejects a zero magnetic estimate and a field parallel to gravity (the
    /// device sitting near a magnetic pole).
    pub min_east_magnitude: f32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.97,
            free_fall_gravity_squared: 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY,
            min_east_magnitude: 0.1,
        }
    }
}
