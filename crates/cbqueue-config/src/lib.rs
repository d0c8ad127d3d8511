//! Configuration management for cbqueue drivers
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the binary)
//! 2. Environment variables (CBQ_* prefix)
//! 3. cbqueue.local.toml (gitignored, local overrides)
//! 4. cbqueue.toml (git-tracked, project config)
//! 5. ~/.config/cbqueue/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main cbqueue configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CbqueueConfig {
    pub queue: QueueConfig,
    pub demo: DemoConfig,
}

/// Settings for the queue under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Shape of the producer/consumer demonstration run.
///
/// Producer `k` writes the values `[k * items_per_producer, (k + 1) * items_per_producer)`.
/// Each consumer performs `reads_per_consumer` blocking pops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub reads_per_consumer: usize,
    /// Shut the queue down once every worker has been joined.
    pub clear_on_finish: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            producers: 2,
            consumers: 4,
            items_per_producer: 10,
            reads_per_consumer: 5,
            clear_on_finish: true,
        }
    }
}

impl DemoConfig {
    /// Total number of values written across all producers, or `None` if
    /// it does not fit in a `usize`
    pub fn total_writes(&self) -> Option<usize> {
        self.producers.checked_mul(self.items_per_producer)
    }

    /// Total number of values read across all consumers, or `None` on overflow
    pub fn total_reads(&self) -> Option<usize> {
        self.consumers.checked_mul(self.reads_per_consumer)
    }
}

impl CbqueueConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// The two-writer, four-reader run over a queue of ten
    pub fn demo() -> Self {
        Self::default()
    }

    /// A long-running configuration that wraps the ring many times
    pub fn stress() -> Self {
        Self {
            queue: QueueConfig { capacity: 4 },
            demo: DemoConfig {
                producers: 4,
                consumers: 4,
                items_per_producer: 250_000,
                reads_per_consumer: 250_000,
                clear_on_finish: true,
            },
        }
    }

    /// Reject configurations that cannot run to completion.
    ///
    /// Every written value must be read by exactly one blocking pop; a
    /// mismatch leaves either producers or consumers blocked forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "queue.capacity must be positive".to_string(),
            ));
        }
        if self.demo.producers == 0 || self.demo.consumers == 0 {
            return Err(ConfigError::ValidationError(
                "demo needs at least one producer and one consumer".to_string(),
            ));
        }
        let (Some(writes), Some(reads)) = (self.demo.total_writes(), self.demo.total_reads())
        else {
            return Err(ConfigError::ValidationError(
                "demo value count overflows usize".to_string(),
            ));
        };
        if writes != reads {
            return Err(ConfigError::ValidationError(format!(
                "demo writes {writes} values but reads {reads}"
            )));
        }
        Ok(())
    }
}
