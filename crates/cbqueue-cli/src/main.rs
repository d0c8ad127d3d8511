//! cbqueue driver CLI.
//!
//! Runs producer and consumer threads against a shared bounded queue and
//! checks that every written value is read exactly once.
//!
//! # Quick Start
//!
//! ```bash
//! # Two writers, four readers, capacity ten
//! cbqueue run
//!
//! # Write a project config and tweak it
//! cbqueue init .
//! cbqueue run --capacity 2 --producers 4 --consumers 2 --items 100 --reads 200
//!
//! # Inspect the effective configuration
//! cbqueue config show --format toml
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// cbqueue - concurrent bounded queue driver.
#[derive(Parser)]
#[command(name = "cbqueue")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Write a default cbqueue.toml.
    Init {
        /// Project directory.
        #[arg(default_value = ".")]
        path: String,
    },

    /// Run the producer/consumer demonstration.
    Run {
        /// Project directory to load cbqueue.toml from.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Load this TOML file instead of the layered configuration.
        #[arg(long)]
        config: Option<String>,

        /// Queue capacity.
        #[arg(short, long)]
        capacity: Option<usize>,

        /// Number of writer threads.
        #[arg(long)]
        producers: Option<usize>,

        /// Number of reader threads.
        #[arg(long)]
        consumers: Option<usize>,

        /// Values written by each writer.
        #[arg(long)]
        items: Option<usize>,

        /// Values read by each reader.
        #[arg(long)]
        reads: Option<usize>,

        /// Leave the queue running after all workers finish.
        #[arg(long)]
        no_clear: bool,

        /// Output format (text, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging. Reports go to stdout, logs to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Init { path } => commands::init::run(&path),
        Commands::Run {
            project,
            config,
            capacity,
            producers,
            consumers,
            items,
            reads,
            no_clear,
            format,
        } => commands::run::run(
            &commands::run::RunArgs {
                project,
                config,
                capacity,
                producers,
                consumers,
                items,
                reads,
                no_clear,
            },
            &format,
        ),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { project, format } => commands::config::show(&project, &format),
        },
    }
}
