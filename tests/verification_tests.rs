use compass_heading::{
    DEG_TO_RAD, EstimationError, EstimatorSettings, EstimatorState, HeadingEstimator, Sample,
    shortest_delta,
};
use nalgebra::Vector3;
use rand::prelude::*;
use rand_pcg::Pcg64;

const GRAVITY: f32 = 9.81;

fn flat() -> Sample {
    Sample::Accelerometer(Vector3::new(0.0, 0.0, GRAVITY))
}

/// Magnetometer sample of a flat device whose top edge points at `heading`
fn facing(heading: f32) -> Sample {
    let psi = heading * DEG_TO_RAD;
    Sample::MagneticField(Vector3::new(-20.0 * psi.sin(), 20.0 * psi.cos(), -40.0))
}

/// Estimator whose estimates follow the raw samples without smoothing
fn unsmoothed() -> HeadingEstimator {
    HeadingEstimator::with_settings(EstimatorSettings {
        smoothing_factor: 0.0,
        ..Default::default()
    })
}

/// Constant input drives both estimates monotonically onto the input
#[test]
fn test_smoothing_convergence() {
    let mut estimator = HeadingEstimator::new();
    let gravity = Vector3::new(0.4, -1.1, 9.7);
    let field = Vector3::new(5.0, 18.0, -41.0);

    let mut gravity_error = gravity.abs();
    let mut field_error = field.abs();
    for _ in 0..200 {
        let _ = estimator.update(Sample::Accelerometer(gravity));
        let _ = estimator.update(Sample::MagneticField(field));

        let next_gravity_error = (estimator.gravity() - gravity).abs();
        let next_field_error = (estimator.geomagnetic() - field).abs();
        for axis in 0..3 {
            assert!(next_gravity_error[axis] < gravity_error[axis]);
            assert!(next_field_error[axis] < field_error[axis]);
        }
        gravity_error = next_gravity_error;
        field_error = next_field_error;
    }

    for _ in 0..3000 {
        let _ = estimator.update(Sample::Accelerometer(gravity));
        let _ = estimator.update(Sample::MagneticField(field));
    }
    assert!((estimator.gravity() - gravity).amax() < 1e-4);
    assert!((estimator.geomagnetic() - field).amax() < 1e-4);
}

/// A single outlier moves the estimate by at most 3% of its distance
#[test]
fn test_smoothing_stability() {
    let mut estimator = HeadingEstimator::new();
    for _ in 0..500 {
        let _ = estimator.update(flat());
        let _ = estimator.update(facing(30.0));
    }

    let before = estimator.geomagnetic();
    let outlier = Vector3::new(300.0, -250.0, 120.0);
    let _ = estimator.update(Sample::MagneticField(outlier));
    let after = estimator.geomagnetic();

    for axis in 0..3 {
        let bound = 0.03 * (outlier[axis] - before[axis]).abs();
        assert!((after[axis] - before[axis]).abs() <= bound + 1e-4);
    }

    // The gravity estimate is untouched by a magnetic outlier
    assert!((estimator.gravity() - Vector3::new(0.0, 0.0, GRAVITY)).amax() < 1e-3);
}

/// Every successful update lands in [0, 360)
#[test]
fn test_heading_range_invariant() {
    let mut rng = Pcg64::seed_from_u64(0x5eed);
    let mut estimator = HeadingEstimator::new();
    let mut produced = 0;

    for _ in 0..20_000 {
        let sample = if rng.random_bool(0.5) {
            Sample::Accelerometer(Vector3::new(
                rng.random_range(-12.0..12.0),
                rng.random_range(-12.0..12.0),
                rng.random_range(-12.0..12.0),
            ))
        } else {
            Sample::MagneticField(Vector3::new(
                rng.random_range(-60.0..60.0),
                rng.random_range(-60.0..60.0),
                rng.random_range(-60.0..60.0),
            ))
        };

        if let Ok(update) = estimator.update(sample) {
            produced += 1;
            assert!((0.0..360.0).contains(&update.new_heading), "{:?}", update);
            assert!((0.0..360.0).contains(&update.previous_heading), "{:?}", update);
        }
    }
    assert!(produced > 0);
}

/// Headings for every direction around the dial stay in range
#[test]
fn test_heading_range_full_circle() {
    let mut estimator = unsmoothed();
    estimator.update(flat()).unwrap_err();

    for tenth in 0..3600 {
        let expected = tenth as f32 / 10.0;
        let update = estimator.update(facing(expected)).unwrap();
        assert!((0.0..360.0).contains(&update.new_heading));
        assert!(shortest_delta(expected, update.new_heading).abs() < 0.01);
    }
}

/// Converged estimates give a stable heading
#[test]
fn test_idempotent_after_convergence() {
    let mut estimator = HeadingEstimator::new();
    for _ in 0..3000 {
        let _ = estimator.update(flat());
        let _ = estimator.update(facing(123.0));
    }

    let reference = estimator.current_heading();
    for _ in 0..100 {
        let a = estimator.update(flat()).unwrap();
        let b = estimator.update(facing(123.0)).unwrap();
        assert!(shortest_delta(reference, a.new_heading).abs() < 1e-4);
        assert!(shortest_delta(reference, b.new_heading).abs() < 1e-4);
    }
    assert!(shortest_delta(123.0, reference).abs() < 0.01);
}

/// Without a magnetometer sample the basis never exists
#[test]
fn test_accelerometer_only_is_degenerate() {
    let mut estimator = HeadingEstimator::new();
    for i in 0..1000 {
        let tilt = (i as f32 * 0.01).sin();
        let result = estimator.update(Sample::Accelerometer(Vector3::new(tilt, 0.0, GRAVITY)));
        assert_eq!(result, Err(EstimationError::DegenerateOrientation));
    }
    assert_eq!(estimator.state(), EstimatorState::Uninitialized);
    assert_eq!(estimator.current_heading(), 0.0);
}

/// Magnetometer without accelerometer is degenerate as well
#[test]
fn test_magnetometer_only_is_degenerate() {
    let mut estimator = HeadingEstimator::new();
    for _ in 0..100 {
        assert_eq!(
            estimator.update(facing(45.0)),
            Err(EstimationError::DegenerateOrientation)
        );
    }
}

/// Device flat, field along device Y: heading is north
#[test]
fn test_flat_device_facing_north() {
    let mut estimator = HeadingEstimator::new();
    let mut last = None;
    for _ in 0..1000 {
        let _ = estimator.update(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.8)));
        if let Ok(update) = estimator.update(Sample::MagneticField(Vector3::new(0.0, 10.0, 0.0))) {
            last = Some(update);
        }
    }

    let update = last.expect("estimator should produce headings");
    assert!(
        shortest_delta(0.0, update.new_heading).abs() < 1.0,
        "heading {}",
        update.new_heading
    );
}

/// Device rotated clockwise by 90° reads east
#[test]
fn test_flat_device_facing_east() {
    let mut estimator = unsmoothed();
    estimator.update(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.8))).unwrap_err();
    let update = estimator
        .update(Sample::MagneticField(Vector3::new(-10.0, 0.0, 0.0)))
        .unwrap();
    assert!((update.new_heading - 90.0).abs() < 1e-3);
}

/// Crossing north is reported as raw headings, not the shortest path
#[test]
fn test_wrap_around_is_not_resolved() {
    let mut estimator = unsmoothed();
    estimator.update(flat()).unwrap_err();

    let first = estimator.update(facing(359.0)).unwrap();
    assert!((first.new_heading - 359.0).abs() < 0.01);
    assert!((estimator.current_heading() - 359.0).abs() < 0.01);

    let crossing = estimator.update(facing(1.0)).unwrap();
    assert_eq!(crossing.previous_heading, first.new_heading);
    assert!((crossing.previous_heading - 359.0).abs() < 0.01);
    assert!((crossing.new_heading - 1.0).abs() < 0.01);

    // The raw sweep goes the long way round
    assert!((crossing.sweep() + 358.0).abs() < 0.02);
    assert!((crossing.shortest_sweep() - 2.0).abs() < 0.02);
}

/// A transient degenerate tick leaves the published heading alone
#[test]
fn test_degenerate_tick_is_recoverable() {
    let mut estimator = unsmoothed();
    estimator.update(flat()).unwrap_err();
    let before = estimator.update(facing(200.0)).unwrap();

    // Field momentarily parallel to gravity
    let result = estimator.update(Sample::MagneticField(Vector3::new(0.0, 0.0, -45.0)));
    assert_eq!(result, Err(EstimationError::DegenerateOrientation));
    assert_eq!(estimator.current_heading(), before.new_heading);

    let after = estimator.update(facing(210.0)).unwrap();
    assert_eq!(after.previous_heading, before.new_heading);
    assert!(shortest_delta(210.0, after.new_heading).abs() < 0.01);
}

/// Tilting the device while facing a fixed direction keeps the heading
#[test]
fn test_tilt_compensated_heading() {
    let heading = 60.0 * DEG_TO_RAD;
    let (sin_h, cos_h) = heading.sin_cos();

    for pitch_deg in [-45.0f32, -20.0, 0.0, 20.0, 45.0] {
        let theta = pitch_deg * DEG_TO_RAD;
        let (s, c) = theta.sin_cos();

        // World (east, north, up) axes seen from a device pitched by theta
        // around its X axis after turning to `heading`
        let x_axis = Vector3::new(cos_h, -sin_h, 0.0);
        let y_axis = Vector3::new(sin_h * c, cos_h * c, s);
        let z_axis = Vector3::new(-sin_h * s, -cos_h * s, c);

        let world_up = Vector3::new(0.0, 0.0, GRAVITY);
        let world_field = Vector3::new(0.0, 20.0, -40.0);
        let to_device = |v: Vector3<f32>| Vector3::new(x_axis.dot(&v), y_axis.dot(&v), z_axis.dot(&v));

        let mut estimator = unsmoothed();
        estimator.update(Sample::Accelerometer(to_device(world_up))).unwrap_err();
        let update = estimator
            .update(Sample::MagneticField(to_device(world_field)))
            .unwrap();

        assert!(
            shortest_delta(60.0, update.new_heading).abs() < 0.05,
            "pitch {}: heading {}",
            pitch_deg,
            update.new_heading
        );
        let orientation = estimator.orientation().unwrap();
        assert!(
            (orientation.pitch + pitch_deg).abs() < 0.05,
            "pitch {} reported as {}",
            pitch_deg,
            orientation.pitch
        );
    }
}
