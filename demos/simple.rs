use compass_heading::pipeline::{run_shared, sample_channel};
use compass_heading::{HeadingUpdate, Sample, SensorEvent, SharedEstimator};
use nalgebra::Vector3;
use std::thread;
use std::time::Duration;

const SAMPLE_PERIOD: Duration = Duration::from_millis(20); // 50 Hz per sensor

fn main() {
    env_logger::init();

    let (tx, rx) = sample_channel(0);

    // Stand-in for the platform sensor callback: a flat device turning slowly clockwise
    let producer = thread::spawn(move || {
        for i in 0..500u64 {
            let heading = (i as f32 * 0.5).to_radians(); // replace with real sensor data
            let accelerometer = Vector3::new(0.0, 0.0, 9.81); // m/s²
            let magnetometer = Vector3::new(-20.0 * heading.sin(), 20.0 * heading.cos(), -40.0); // µT

            let timestamp = i * SAMPLE_PERIOD.as_nanos() as u64;
            let events = [
                SensorEvent::with_timestamp(Sample::Accelerometer(accelerometer), timestamp),
                SensorEvent::with_timestamp(Sample::MagneticField(magnetometer), timestamp),
            ];
            for event in events {
                if tx.send(event).is_err() {
                    return;
                }
            }
            thread::sleep(SAMPLE_PERIOD / 10);
        }
    });

    let estimator = SharedEstimator::new();
    let mut count = 0u32;
    let stats = run_shared(&rx, &estimator, &mut |update: HeadingUpdate| {
        count += 1;
        if count % 50 == 0 {
            let (from, to) = update.needle_rotation();
            println!(
                "Heading: {:6.2}° -> {:6.2}°   needle {:7.2}° -> {:7.2}°",
                update.previous_heading, update.new_heading, from, to
            );
        }
    });

    producer.join().expect("producer thread panicked");

    println!(
        "Received {} samples, presented {} headings, skipped {}",
        stats.received, stats.presented, stats.skipped
    );
    if let Ok(orientation) = estimator.orientation() {
        println!(
            "Final azimuth: {:.2}, pitch: {:.2}, roll: {:.2}",
            orientation.azimuth, orientation.pitch, orientation.roll
        );
    }
}
