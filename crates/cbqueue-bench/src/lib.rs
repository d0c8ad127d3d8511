//! # cbqueue-bench: Throughput and latency benchmarks for cbqueue
//!
//! This crate provides latency measurement helpers and Criterion benchmarks
//! for the bounded queue.
//!
//! ## Benchmarks
//!
//! - **queue**: Uncontended `try_push`/`try_pop` and SPSC blocking throughput
//! - **contention**: MPMC throughput and a comparison against
//!   `crossbeam_queue::ArrayQueue`
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p cbqueue-bench
//!
//! # Run specific benchmark
//! cargo bench -p cbqueue-bench --bench contention
//!
//! # Save baseline for comparison
//! cargo bench -p cbqueue-bench --bench queue -- --save-baseline main
//! ```

#![allow(clippy::cast_precision_loss)] // Latency stats use f64 for percentile calculations
#![allow(clippy::cast_possible_truncation)] // Nanosecond durations fit in u64

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cbqueue::BoundedQueue;
use hdrhistogram::Histogram;

/// Tracks latency percentiles for operations.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    histogram: Histogram<u64>,
}

impl LatencyTracker {
    /// Creates a new latency tracker.
    ///
    /// Auto-resizing, 3 significant digits.
    pub fn new() -> Self {
        Self {
            histogram: Histogram::new(3).expect("valid histogram config"),
        }
    }

    /// Records a latency measurement in nanoseconds.
    pub fn record(&mut self, latency_ns: u64) {
        self.histogram.record(latency_ns).ok();
    }

    /// Records the time elapsed since `start`.
    pub fn record_since(&mut self, start: Instant) {
        self.record(start.elapsed().as_nanos() as u64);
    }

    /// Folds another tracker's samples into this one.
    pub fn merge(&mut self, other: &LatencyTracker) {
        self.histogram.add(&other.histogram).ok();
    }

    /// Returns the total number of recorded samples.
    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    /// Returns the p50 (median) latency in nanoseconds.
    pub fn p50(&self) -> u64 {
        self.histogram.value_at_quantile(0.50)
    }

    /// Returns the p99 latency in nanoseconds.
    pub fn p99(&self) -> u64 {
        self.histogram.value_at_quantile(0.99)
    }

    /// Returns the p99.9 latency in nanoseconds.
    pub fn p999(&self) -> u64 {
        self.histogram.value_at_quantile(0.999)
    }

    /// Returns the maximum latency in nanoseconds.
    pub fn max(&self) -> u64 {
        self.histogram.max()
    }

    /// Returns the mean latency in nanoseconds.
    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Exports latency statistics as JSON for CI integration.
    pub fn to_json(&self, operation: &str) -> String {
        serde_json::json!({
            "operation": operation,
            "count": self.count(),
            "p50_ns": self.p50(),
            "p99_ns": self.p99(),
            "p999_ns": self.p999(),
            "max_ns": self.max(),
            "mean_ns": self.mean(),
        })
        .to_string()
    }

    /// Prints a summary of latency statistics.
    pub fn print_summary(&self, operation: &str) {
        println!("{operation} Latency Statistics:");
        for (label, value) in [
            ("p50:  ", self.p50()),
            ("p99:  ", self.p99()),
            ("p99.9:", self.p999()),
            ("max:  ", self.max()),
        ] {
            println!(
                "  {label} {value:>10} ns ({:>8.2} μs)",
                value as f64 / 1000.0
            );
        }
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-operation latencies from one MPMC run.
#[derive(Debug)]
pub struct MpmcLatency {
    /// Blocking `push` latencies across all producers.
    pub push: LatencyTracker,
    /// Blocking `pop` latencies across all consumers.
    pub pop: LatencyTracker,
    /// Wall time from first spawn to last join.
    pub elapsed: Duration,
}

impl MpmcLatency {
    /// Elements moved through the queue per second.
    pub fn throughput(&self) -> f64 {
        self.pop.count() as f64 / self.elapsed.as_secs_f64()
    }
}

/// Moves `producers * items_per_producer` values through a fresh queue and
/// records the latency of every blocking call.
///
/// # Panics
///
/// Panics if the total number of values is not divisible by `consumers`, or
/// if a worker thread panics.
pub fn run_mpmc_latency(
    capacity: usize,
    producers: usize,
    consumers: usize,
    items_per_producer: usize,
) -> MpmcLatency {
    let total = producers * items_per_producer;
    assert!(
        consumers > 0 && total % consumers == 0,
        "{total} values cannot be split across {consumers} consumers"
    );
    let reads_per_consumer = total / consumers;

    let queue = Arc::new(BoundedQueue::new(capacity));
    let started = Instant::now();

    let readers: Vec<_> = (0..consumers)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut tracker = LatencyTracker::new();
                for _ in 0..reads_per_consumer {
                    let start = Instant::now();
                    queue.pop().expect("queue is not cleared during the run");
                    tracker.record_since(start);
                }
                tracker
            })
        })
        .collect();

    let writers: Vec<_> = (0..producers)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut tracker = LatencyTracker::new();
                for v in p * items_per_producer..(p + 1) * items_per_producer {
                    let start = Instant::now();
                    queue.push(v).expect("queue is not cleared during the run");
                    tracker.record_since(start);
                }
                tracker
            })
        })
        .collect();

    let mut push = LatencyTracker::new();
    for writer in writers {
        push.merge(&writer.join().expect("writer panicked"));
    }
    let mut pop = LatencyTracker::new();
    for reader in readers {
        pop.merge(&reader.join().expect("reader panicked"));
    }

    MpmcLatency {
        push,
        pop,
        elapsed: started.elapsed(),
    }
}
