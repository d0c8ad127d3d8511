//! Run command - the producer/consumer demonstration.
//!
//! Writer `k` pushes `items_per_producer` consecutive values starting at
//! `k * items_per_producer`; every reader performs `reads_per_consumer`
//! blocking pops. Writers are joined first, then readers, and finally the
//! queue is cleared. Because the configuration is validated for parity,
//! every reader returns without needing the shutdown signal.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use cbqueue::BoundedQueue;
use cbqueue_config::{CbqueueConfig, ConfigLoader};
use serde::Serialize;

/// Command-line overrides for the run.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub project: String,
    pub config: Option<String>,
    pub capacity: Option<usize>,
    pub producers: Option<usize>,
    pub consumers: Option<usize>,
    pub items: Option<usize>,
    pub reads: Option<usize>,
    pub no_clear: bool,
}

impl RunArgs {
    /// Applies flags on top of the loaded configuration.
    fn apply(&self, config: &mut CbqueueConfig) {
        if let Some(capacity) = self.capacity {
            config.queue.capacity = capacity;
        }
        if let Some(producers) = self.producers {
            config.demo.producers = producers;
        }
        if let Some(consumers) = self.consumers {
            config.demo.consumers = consumers;
        }
        if let Some(items) = self.items {
            config.demo.items_per_producer = items;
        }
        if let Some(reads) = self.reads {
            config.demo.reads_per_consumer = reads;
        }
        if self.no_clear {
            config.demo.clear_on_finish = false;
        }
    }
}

/// Outcome of a demonstration run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub values_written: usize,
    pub values_read: usize,
    /// Values read more than once.
    pub duplicates: Vec<usize>,
    /// Written values no reader saw.
    pub missing: Vec<usize>,
    pub cleared: bool,
    pub elapsed_ms: u64,
}

impl RunReport {
    fn new(
        config: &CbqueueConfig,
        values_written: usize,
        reads: &[Vec<usize>],
        cleared: bool,
        elapsed: Duration,
    ) -> Self {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for value in reads.iter().flatten() {
            if !seen.insert(*value) {
                duplicates.push(*value);
            }
        }
        let missing = (0..values_written)
            .filter(|v| !seen.contains(v))
            .collect();

        Self {
            capacity: config.queue.capacity,
            producers: config.demo.producers,
            consumers: config.demo.consumers,
            values_written,
            values_read: reads.iter().map(Vec::len).sum(),
            duplicates,
            missing,
            cleared,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// True when the reads are exactly the written values, each once.
    pub fn is_exact(&self) -> bool {
        self.duplicates.is_empty() && self.missing.is_empty()
    }
}

pub fn run(args: &RunArgs, format: &str) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => CbqueueConfig::load_from_dir(&args.project)
            .context("Failed to load configuration")?,
    };
    args.apply(&mut config);

    let report = drive(&config)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report(&report),
    }

    if !report.is_exact() {
        anyhow::bail!(
            "{} duplicate and {} missing values",
            report.duplicates.len(),
            report.missing.len()
        );
    }
    Ok(())
}

/// Runs writers and readers over a fresh queue and collects what was read.
///
/// The configuration is validated first, so every writer's value range fits
/// below `total_writes` without overflow.
pub fn drive(config: &CbqueueConfig) -> Result<RunReport> {
    config.validate()?;
    let demo = &config.demo;
    let values_written = demo
        .total_writes()
        .context("demo value count overflows usize")?;
    let queue = Arc::new(BoundedQueue::try_new(config.queue.capacity)?);

    tracing::info!(
        capacity = config.queue.capacity,
        producers = demo.producers,
        consumers = demo.consumers,
        "starting run"
    );
    let started = Instant::now();

    let readers = (1..=demo.consumers)
        .map(|tid| {
            let queue = Arc::clone(&queue);
            let reads = demo.reads_per_consumer;
            thread::Builder::new()
                .name(format!("cbq-read-{tid}"))
                .spawn(move || read(&queue, tid, reads))
        })
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to spawn reader thread")?;

    let writers = (1..=demo.producers)
        .map(|tid| {
            let queue = Arc::clone(&queue);
            let items = demo.items_per_producer;
            let base = (tid - 1) * items;
            thread::Builder::new()
                .name(format!("cbq-write-{tid}"))
                .spawn(move || write(&queue, tid, base, items))
        })
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to spawn writer thread")?;

    for (i, writer) in writers.into_iter().enumerate() {
        writer
            .join()
            .map_err(|_| anyhow!("writer t{} panicked", i + 1))?;
    }

    let mut reads = Vec::with_capacity(demo.consumers);
    for (i, reader) in readers.into_iter().enumerate() {
        let values = reader
            .join()
            .map_err(|_| anyhow!("reader t{} panicked", i + 1))?;
        reads.push(values);
    }

    if demo.clear_on_finish {
        queue.clear();
    }

    let report = RunReport::new(
        config,
        values_written,
        &reads,
        demo.clear_on_finish,
        started.elapsed(),
    );
    tracing::info!(
        values_read = report.values_read,
        elapsed_ms = report.elapsed_ms,
        "run finished"
    );
    Ok(report)
}

fn read(queue: &BoundedQueue<usize>, tid: usize, reads: usize) -> Vec<usize> {
    let mut values = Vec::with_capacity(reads);
    for _ in 0..reads {
        match queue.pop() {
            Ok(value) => {
                tracing::info!("read thread t{tid}: value = {value}");
                values.push(value);
            }
            Err(e) => {
                tracing::warn!("read thread t{tid}: {e}");
                break;
            }
        }
    }
    values
}

fn write(queue: &BoundedQueue<usize>, tid: usize, base: usize, items: usize) {
    for value in base..base + items {
        if let Err(e) = queue.push(value) {
            tracing::warn!("write thread t{tid}: {e}, value {value} not written");
            return;
        }
        tracing::info!("write thread t{tid}: value = {value}");
    }
}

fn print_report(report: &RunReport) {
    println!("Run summary");
    println!("===========\n");
    println!("  Capacity:       {}", report.capacity);
    println!("  Producers:      {}", report.producers);
    println!("  Consumers:      {}", report.consumers);
    println!("  Values written: {}", report.values_written);
    println!("  Values read:    {}", report.values_read);
    println!("  Duplicates:     {}", report.duplicates.len());
    println!("  Missing:        {}", report.missing.len());
    println!("  Cleared:        {}", report.cleared);
    println!("  Elapsed:        {} ms", report.elapsed_ms);
}
