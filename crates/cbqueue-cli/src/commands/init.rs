//! Initialize command - writes a default cbqueue.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cbqueue_config::{CbqueueConfig, Paths};

pub fn run(path: &str) -> Result<()> {
    let project_dir = Path::new(path);

    if Paths::is_initialized(project_dir) {
        anyhow::bail!(
            "Project already initialized in {}. cbqueue.toml already exists.",
            project_dir.display()
        );
    }

    fs::create_dir_all(project_dir).context("Failed to create project directory")?;

    let config = CbqueueConfig::demo();
    let config_path = Paths::project_config_file(project_dir);
    let config_content =
        toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    fs::write(&config_path, config_content).context("Failed to write cbqueue.toml")?;

    println!("Wrote {}", config_path.display());
    println!("Run `cbqueue run --project {}` to start.", project_dir.display());

    Ok(())
}
