//! Thread-safe estimator handle
//!
//! Samples usually arrive on a sensor delivery thread while the display reads
//! the heading from another. [`SharedEstimator`] serializes updates behind a
//! mutex so both estimates and the current heading change as one unit, and
//! mirrors the published heading into an atomic so readers never wait on a
//! running update.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::Result;
use crate::estimator::HeadingEstimator;
use crate::types::{EstimatorSettings, HeadingUpdate, Orientation, Sample};

#[derive(Debug)]
struct Inner {
    estimator: Mutex<HeadingEstimator>,
    /// `f32::to_bits` of the last published heading
    heading_bits: AtomicU32,
}

/// Cloneable handle to one [`HeadingEstimator`] shared between threads
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{Sample, SharedEstimator};
///
/// let shared = SharedEstimator::new();
/// let writer = shared.clone();
///
/// std::thread::spawn(move || {
///     for _ in 0..100 {
///         let _ = writer.update(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81)));
///         let _ = writer.update(Sample::MagneticField(Vector3::new(0.0, 20.0, -40.0)));
///     }
/// })
/// .join()
/// .unwrap();
///
/// assert!((0.0..360.0).contains(&shared.current_heading()));
/// ```
#[derive(Debug, Clone)]
pub struct SharedEstimator {
    inner: Arc<Inner>,
}

impl SharedEstimator {
    /// Create a shared estimator with default settings
    pub fn new() -> Self {
        Self::from_estimator(HeadingEstimator::new())
    }

    /// Create a shared estimator with the specified settings
    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Self::from_estimator(HeadingEstimator::with_settings(settings))
    }

    /// Wrap an existing estimator, keeping its smoothed state
    pub fn from_estimator(estimator: HeadingEstimator) -> Self {
        let heading = estimator.current_heading();
        Self {
            inner: Arc::new(Inner {
                estimator: Mutex::new(estimator),
                heading_bits: AtomicU32::new(heading.to_bits()),
            }),
        }
    }

    /// Feed one sample; concurrent callers are serialized
    pub fn update(&self, sample: Sample) -> Result<HeadingUpdate> {
        let mut estimator = self.inner.estimator.lock();
        let update = estimator.update(sample)?;
        // Published while the lock is held so snapshots follow update order
        self.inner
            .heading_bits
            .store(update.new_heading.to_bits(), Ordering::Release);
        Ok(update)
    }

    /// Last published heading in degrees, read without locking
    pub fn current_heading(&self) -> f32 {
        f32::from_bits(self.inner.heading_bits.load(Ordering::Acquire))
    }

    /// Azimuth, pitch and roll from a consistent snapshot of both estimates
    pub fn orientation(&self) -> Result<Orientation> {
        self.inner.estimator.lock().orientation()
    }

    /// Copy of the estimator state at this instant
    pub fn snapshot(&self) -> HeadingEstimator {
        self.inner.estimator.lock().clone()
    }

    /// Run `f` with exclusive access to the estimator
    pub fn with_estimator<R>(&self, f: impl FnOnce(&mut HeadingEstimator) -> R) -> R {
        let mut estimator = self.inner.estimator.lock();
        let result = f(&mut *estimator);
        self.inner
            .heading_bits
            .store(estimator.current_heading().to_bits(), Ordering::Release);
        result
    }
}

impl Default for SharedEstimator {
    fn default() -> Self {
        Self::new()
    }
}
