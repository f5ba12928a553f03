//! Heading estimator: smoothing, rotation and heading tracking

use nalgebra::Vector3;

use crate::error::Result;
use crate::filter::LowPassFilter;
use crate::rotation::RotationMatrix;
use crate::types::{EstimatorSettings, EstimatorState, HeadingUpdate, Orientation, Sample};

/// Compass heading estimator
///
/// Owns one exponentially smoothed estimate per sensor kind and the last
/// published heading. Every [`HeadingEstimator::update`] smooths the incoming
/// sample into its estimate, rebuilds the rotation basis from both estimates
/// and, when the basis is well defined, publishes a new heading.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{HeadingEstimator, Sample};
///
/// let mut estimator = HeadingEstimator::new();
///
/// for _ in 0..200 {
///     let _ = estimator.update(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81)));
///     if let Ok(update) = estimator.update(Sample::MagneticField(Vector3::new(0.0, 20.0, -40.0))) {
///         // hand update.previous_heading / update.new_heading to the display
///         assert!((0.0..360.0).contains(&update.new_heading));
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    /// Estimator settings
    settings: EstimatorSettings,
    /// Smoothed accelerometer reading
    gravity: LowPassFilter,
    /// Smoothed magnetometer reading
    geomagnetic: LowPassFilter,
    /// Last published heading in degrees
    current_heading: f32,
}

impl HeadingEstimator {
    /// Create an estimator with default settings
    pub fn new() -> Self {
        Self::with_settings(EstimatorSettings::default())
    }

    /// Create an estimator with the specified settings
    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Self {
            settings,
            gravity: LowPassFilter::new(settings.smoothing_factor),
            geomagnetic: LowPassFilter::new(settings.smoothing_factor),
            current_heading: 0.0,
        }
    }

    /// Update estimator settings
    ///
    /// The smoothed estimates and the current heading are kept.
    pub fn set_settings(&mut self, settings: EstimatorSettings) {
        self.settings = settings;
        self.gravity.set_smoothing_factor(settings.smoothing_factor);
        self.geomagnetic.set_smoothing_factor(settings.smoothing_factor);
    }

    /// Get current estimator settings
    pub fn settings(&self) -> EstimatorSettings {
        self.settings
    }

    /// Feed one raw sample and compute the resulting heading transition
    ///
    /// Returns [`EstimationError::DegenerateOrientation`](crate::EstimationError::DegenerateOrientation)
    /// when the smoothed estimates do not yet define a rotation. The sample is
    /// still folded into its estimate in that case, and the current heading
    /// is left unchanged.
    ///
    /// The returned pair is not resolved to the shortest path: crossing north
    /// from 359° to 1° reports `previous_heading = 359`, `new_heading = 1`.
    pub fn update(&mut self, sample: Sample) -> Result<HeadingUpdate> {
        let was_tracking = self.state() == EstimatorState::Tracking;
        self.smooth(sample);
        if !was_tracking && self.state() == EstimatorState::Tracking {
            log::debug!(
                "both sensors reporting after {} accelerometer and {} magnetometer samples",
                self.gravity.sample_count(),
                self.geomagnetic.sample_count()
            );
        }

        let rotation = self.rotation().inspect_err(|error| {
            log::trace!("skipping {:?} sample: {}", sample.kind(), error);
        })?;

        let azimuth = rotation.azimuth();
        let update = HeadingUpdate {
            previous_heading: self.current_heading,
            new_heading: azimuth,
        };
        self.current_heading = azimuth;

        Ok(update)
    }

    /// Rotation basis built from the current smoothed estimates
    pub fn rotation(&self) -> Result<RotationMatrix> {
        RotationMatrix::from_vectors(
            self.gravity.estimate(),
            self.geomagnetic.estimate(),
            &self.settings,
        )
    }

    /// Azimuth, pitch and roll from the current smoothed estimates
    pub fn orientation(&self) -> Result<Orientation> {
        Ok(self.rotation()?.orientation())
    }

    /// Magnetic dip angle in degrees from the current smoothed estimates
    pub fn inclination(&self) -> Result<f32> {
        let geomagnetic = self.geomagnetic.estimate();
        Ok(self.rotation()?.inclination(&geomagnetic))
    }

    /// Last published heading in degrees, `[0, 360)`
    ///
    /// Starts at 0 and only changes on a successful update.
    pub fn current_heading(&self) -> f32 {
        self.current_heading
    }

    /// Smoothed gravity estimate
    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity.estimate()
    }

    /// Smoothed magnetic field estimate
    pub fn geomagnetic(&self) -> Vector3<f32> {
        self.geomagnetic.estimate()
    }

    /// Whether both sensor kinds have delivered at least one sample
    pub fn state(&self) -> EstimatorState {
        if self.gravity.has_samples() && self.geomagnetic.has_samples() {
            EstimatorState::Tracking
        } else {
            EstimatorState::Uninitialized
        }
    }

    /// Fold a raw sample into the estimate matching its kind
    fn smooth(&mut self, sample: Sample) {
        match sample {
            Sample::Accelerometer(raw) => {
                self.gravity.smooth(raw);
            }
            Sample::MagneticField(raw) => {
                self.geomagnetic.smooth(raw);
            }
        }
    }
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new()
    }
}
