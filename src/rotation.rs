//! Rotation basis construction from gravity and magnetic field estimates

use crate::error::{EstimationError, Result};
use crate::math::{RAD_TO_DEG, normalize_heading};
use crate::types::{EstimatorSettings, Orientation};
use nalgebra::{Matrix3, Vector3};

/// Orthonormal rotation from the device frame to the world frame
///
/// Rows are the world axes expressed in device coordinates:
/// - row 0: magnetic east, `normalize(magnetic × gravity)`
/// - row 1: magnetic north, `normalize(gravity × east)`
/// - row 2: up, `normalize(gravity)`
///
/// The matrix is rebuilt from the smoothed estimates on every update and is
/// not kept between updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    matrix: Matrix3<f32>,
}

impl RotationMatrix {
    /// Build the rotation basis from a gravity and a magnetic field vector
    ///
    /// Fails with [`EstimationError::DegenerateOrientation`] when the gravity
    /// magnitude is below the free-fall threshold, or when the east vector is
    /// too short to normalize (zero magnetic field, or a field parallel to
    /// gravity).
    ///
    /// # Example
    /// ```
    /// use nalgebra::Vector3;
    /// use compass_heading::{EstimatorSettings, RotationMatrix};
    ///
    /// let gravity = Vector3::new(0.0, 0.0, 9.8);   // lying flat, face up
    /// let magnetic = Vector3::new(0.0, 10.0, 0.0); // top edge toward north
    /// let rotation = RotationMatrix::from_vectors(gravity, magnetic, &EstimatorSettings::default())?;
    /// assert!(rotation.azimuth() < 1.0 || rotation.azimuth() > 359.0);
    /// # Ok::<(), compass_heading::EstimationError>(())
    /// ```
    pub fn from_vectors(
        gravity: Vector3<f32>,
        geomagnetic: Vector3<f32>,
        settings: &EstimatorSettings,
    ) -> Result<Self> {
        let gravity_squared = gravity.magnitude_squared();
        if gravity_squared < settings.free_fall_gravity_squared || gravity_squared == 0.0 {
            return Err(EstimationError::DegenerateOrientation);
        }

        let east = geomagnetic.cross(&gravity);
        let east_magnitude = east.magnitude();
        if east_magnitude < settings.min_east_magnitude || east_magnitude == 0.0 {
            return Err(EstimationError::DegenerateOrientation);
        }
        let east = east / east_magnitude;

        // Non-zero: east is perpendicular to a non-zero gravity
        let north = gravity.cross(&east);
        let north = north / north.magnitude();

        let up = gravity / gravity_squared.sqrt();

        Ok(Self {
            matrix: Matrix3::from_rows(&[east.transpose(), north.transpose(), up.transpose()]),
        })
    }

    /// Heading in degrees, `[0, 360)`, clockwise from magnetic north
    pub fn azimuth(&self) -> f32 {
        normalize_heading(self.raw_azimuth() * RAD_TO_DEG)
    }

    /// Azimuth, pitch and roll in degrees
    pub fn orientation(&self) -> Orientation {
        let m = &self.matrix;
        let pitch = (-m[(2, 1)]).clamp(-1.0, 1.0).asin();
        let roll = (-m[(2, 0)]).atan2(m[(2, 2)]);
        Orientation::from_radians(self.raw_azimuth(), pitch, roll)
    }

    /// Magnetic dip angle in degrees, positive when the field points below
    /// the horizon
    ///
    /// `geomagnetic` must be the vector this rotation was built from.
    pub fn inclination(&self, geomagnetic: &Vector3<f32>) -> f32 {
        let horizontal = geomagnetic.dot(&self.north());
        let vertical = geomagnetic.dot(&self.up());
        (-vertical).atan2(horizontal) * RAD_TO_DEG
    }

    /// Magnetic east in device coordinates
    pub fn east(&self) -> Vector3<f32> {
        self.matrix.row(0).transpose()
    }

    /// Magnetic north in device coordinates
    pub fn north(&self) -> Vector3<f32> {
        self.matrix.row(1).transpose()
    }

    /// Up in device coordinates
    pub fn up(&self) -> Vector3<f32> {
        self.matrix.row(2).transpose()
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }

    /// Yaw in radians, `(-π, π]`
    fn raw_azimuth(&self) -> f32 {
        self.matrix[(0, 1)].atan2(self.matrix[(1, 1)])
    }
}
