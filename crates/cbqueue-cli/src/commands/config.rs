//! Configuration management commands.

use anyhow::{Context, Result};
use cbqueue_config::CbqueueConfig;

/// Show current configuration.
pub fn show(project: &str, format: &str) -> Result<()> {
    let config = CbqueueConfig::load_from_dir(project).context("Failed to load configuration")?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        "toml" => {
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
        }
        _ => {
            println!("cbqueue Configuration");
            println!("=====================\n");

            println!("Queue:");
            println!("  Capacity: {}", config.queue.capacity);
            println!();

            println!("Demo:");
            println!("  Producers: {}", config.demo.producers);
            println!("  Consumers: {}", config.demo.consumers);
            println!("  Items per producer: {}", config.demo.items_per_producer);
            println!("  Reads per consumer: {}", config.demo.reads_per_consumer);
            println!("  Clear on finish: {}", config.demo.clear_on_finish);
        }
    }

    Ok(())
}
