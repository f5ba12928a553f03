//! Channel-based sample delivery and heading presentation
//!
//! The host pushes [`SensorEvent`]s into a crossbeam channel from whatever
//! callback its sensor framework offers. A single consumer drains the
//! channel, feeds the estimator and hands every new heading to a
//! [`HeadingSink`]. Degenerate ticks are skipped and counted.
//!
//! ```text
//! sensor callback ──SensorEvent──▶ channel ──▶ run() ──HeadingUpdate──▶ HeadingSink
//! ```
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use compass_heading::{HeadingEstimator, HeadingUpdate, Sample, SensorEvent};
//! use compass_heading::pipeline::{run, sample_channel};
//!
//! let (tx, rx) = sample_channel(0);
//! for _ in 0..100 {
//!     tx.send(SensorEvent::new(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81)))).unwrap();
//!     tx.send(SensorEvent::new(Sample::MagneticField(Vector3::new(0.0, 20.0, -40.0)))).unwrap();
//! }
//! drop(tx);
//!
//! let mut estimator = HeadingEstimator::new();
//! let mut last = None;
//! let stats = run(&rx, &mut estimator, &mut |update: HeadingUpdate| last = Some(update));
//!
//! assert_eq!(stats.received, 200);
//! assert!(last.is_some());
//! ```

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::error::Result;
use crate::estimator::HeadingEstimator;
use crate::shared::SharedEstimator;
use crate::types::{HeadingUpdate, SensorEvent};

/// Consumer of heading transitions, typically a view animating a needle
///
/// Animation duration, easing and the choice of rotation direction belong to
/// the sink.
pub trait HeadingSink {
    fn present(&mut self, update: HeadingUpdate);
}

impl<F: FnMut(HeadingUpdate)> HeadingSink for F {
    fn present(&mut self, update: HeadingUpdate) {
        self(update)
    }
}

/// Counters collected while draining a sample channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Events taken from the channel
    pub received: u64,
    /// Headings handed to the sink
    pub presented: u64,
    /// Events that produced no heading (degenerate orientation)
    pub skipped: u64,
}

impl PipelineStats {
    fn record(&mut self, outcome: &Result<HeadingUpdate>) {
        self.received += 1;
        match outcome {
            Ok(_) => self.presented += 1,
            Err(_) => self.skipped += 1,
        }
    }
}

/// Create the channel the host pushes sensor events into
///
/// A `capacity` of 0 gives an unbounded channel. Sample delivery has no
/// back-pressure, so a bounded channel only makes sense when the host
/// prefers `try_send` and dropping events over queueing them.
pub fn sample_channel(capacity: usize) -> (Sender<SensorEvent>, Receiver<SensorEvent>) {
    if capacity == 0 {
        unbounded()
    } else {
        bounded(capacity)
    }
}

/// Drain `receiver` into `estimator` until every sender is dropped
pub fn run<S: HeadingSink + ?Sized>(
    receiver: &Receiver<SensorEvent>,
    estimator: &mut HeadingEstimator,
    sink: &mut S,
) -> PipelineStats {
    drain(receiver, sink, |event| estimator.update(event.sample))
}

/// Same as [`run`], against an estimator shared with heading readers
pub fn run_shared<S: HeadingSink + ?Sized>(
    receiver: &Receiver<SensorEvent>,
    estimator: &SharedEstimator,
    sink: &mut S,
) -> PipelineStats {
    drain(receiver, sink, |event| estimator.update(event.sample))
}

fn drain<S, F>(receiver: &Receiver<SensorEvent>, sink: &mut S, mut update: F) -> PipelineStats
where
    S: HeadingSink + ?Sized,
    F: FnMut(&SensorEvent) -> Result<HeadingUpdate>,
{
    let mut stats = PipelineStats::default();

    for event in receiver.iter() {
        let outcome = update(&event);
        stats.record(&outcome);

        if let Ok(heading) = outcome {
            log::trace!(
                "heading {:.1} -> {:.1} (t={:?})",
                heading.previous_heading,
                heading.new_heading,
                event.timestamp_ns
            );
            sink.present(heading);
        }
    }

    log::debug!(
        "sample channel closed: {} received, {} presented, {} skipped",
        stats.received,
        stats.presented,
        stats.skipped
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use nalgebra::Vector3;
    use std::thread;

    fn accel() -> SensorEvent {
        SensorEvent::new(Sample::Accelerometer(Vector3::new(0.0, 0.0, 9.81)))
    }

    fn mag() -> SensorEvent {
        SensorEvent::new(Sample::MagneticField(Vector3::new(0.0, 20.0, -40.0)))
    }

    #[test]
    fn test_accelerometer_only_is_all_skipped() {
        let (tx, rx) = sample_channel(0);
        for _ in 0..50 {
            tx.send(accel()).unwrap();
        }
        drop(tx);

        let mut presented = Vec::new();
        let stats = run(&rx, &mut HeadingEstimator::new(), &mut |u: HeadingUpdate| presented.push(u));

        assert_eq!(stats.received, 50);
        assert_eq!(stats.skipped, 50);
        assert_eq!(stats.presented, 0);
        assert!(presented.is_empty());
    }

    #[test]
    fn test_presented_updates_chain() {
        let (tx, rx) = sample_channel(0);
        for _ in 0..100 {
            tx.send(accel()).unwrap();
            tx.send(mag()).unwrap();
        }
        drop(tx);

        let mut presented: Vec<HeadingUpdate> = Vec::new();
        let stats = run(&rx, &mut HeadingEstimator::new(), &mut |u: HeadingUpdate| presented.push(u));

        assert_eq!(stats.received, 200);
        assert_eq!(stats.presented + stats.skipped, 200);
        assert_eq!(stats.presented as usize, presented.len());
        assert!(stats.skipped > 0, "warm-up samples should be skipped");
        for pair in presented.windows(2) {
            assert_eq!(pair[1].previous_heading, pair[0].new_heading);
        }
    }

    #[test]
    fn test_run_shared_from_producer_thread() {
        let (tx, rx) = sample_channel(16);
        let producer = thread::spawn(move || {
            for i in 0..500u64 {
                tx.send(SensorEvent::with_timestamp(accel().sample, i * 2)).unwrap();
                tx.send(SensorEvent::with_timestamp(mag().sample, i * 2 + 1)).unwrap();
            }
        });

        let shared = SharedEstimator::new();
        let mut count = 0;
        let stats = run_shared(&rx, &shared, &mut |_: HeadingUpdate| count += 1);
        producer.join().unwrap();

        assert_eq!(stats.received, 1000);
        assert_eq!(stats.presented, count);
        let heading = shared.current_heading();
        assert!(heading < 0.01 || heading > 359.99, "heading {}", heading);
    }
}
