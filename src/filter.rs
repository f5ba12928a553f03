//! Exponential smoothing for raw sensor vectors

use nalgebra::Vector3;

/// Per-axis exponential moving average
///
/// Each call to [`LowPassFilter::smooth`] applies
/// `estimate = α × estimate + (1 - α) × raw` to every axis, which suppresses
/// high-frequency jitter while following slow orientation changes. The
/// estimate starts at the zero vector and is never reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassFilter {
    /// Weight of the previous estimate (α)
    smoothing_factor: f32,
    /// Current smoothed estimate
    estimate: Vector3<f32>,
    /// Number of samples folded into the estimate
    sample_count: u32,
}

impl LowPassFilter {
    /// Create a filter with the given smoothing factor, clamped to `[0, 1]`
    ///
    /// # Example
    /// ```
    /// use nalgebra::Vector3;
    /// use compass_heading::LowPassFilter;
    ///
    /// let mut filter = LowPassFilter::new(0.97);
    /// let estimate = filter.smooth(Vector3::new(0.0, 0.0, 10.0));
    /// assert!((estimate.z - 0.3).abs() < 1e-5);
    /// ```
    pub fn new(smoothing_factor: f32) -> Self {
        Self {
            smoothing_factor: smoothing_factor.clamp(0.0, 1.0),
            estimate: Vector3::zeros(),
            sample_count: 0,
        }
    }

    /// Fold a raw reading into the estimate and return the updated estimate
    pub fn smooth(&mut self, raw: Vector3<f32>) -> Vector3<f32> {
        let alpha = self.smoothing_factor;
        self.estimate = self.estimate * alpha + raw * (1.0 - alpha);
        self.sample_count = self.sample_count.saturating_add(1);
        self.estimate
    }

    /// Current smoothed estimate
    pub fn estimate(&self) -> Vector3<f32> {
        self.estimate
    }

    /// Whether at least one sample has been smoothed in
    pub fn has_samples(&self) -> bool {
        self.sample_count > 0
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    /// Change the smoothing factor without discarding the current estimate
    pub fn set_smoothing_factor(&mut self, smoothing_factor: f32) {
        self.smoothing_factor = smoothing_factor.clamp(0.0, 1.0);
    }
}
