//! bodymeasure: Command-line interface for body measurements.
//!
//! Reads reconstructed rig JSON (a single file or a directory of
//! `person_<n>_rig.json` files) and prints the measurement report.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=body_metrics=info` - Basic operation logging
//! - `RUST_LOG=body_metrics=debug` - Levels and landmark resolution
//! - `RUST_LOG=body_metrics::timing=debug` - Performance timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Measure the first person, scaled to a known stature
//! bodymeasure measure person_1_rig.json --target-height 172
//!
//! # Every person in an export directory, as JSON
//! bodymeasure --format json measure ./export
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use miette::Diagnostic;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{info, measure, schema, section};

/// bodymeasure - Anthropometric measurements from body rigs.
///
/// Computes heights, girths, widths and lengths from a reconstructed body
/// mesh and skeleton, scaled to a real-world stature.
#[derive(Parser)]
#[command(name = "bodymeasure")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the measurement report
    Measure {
        /// Rig JSON file, or a directory of person_<n>_rig.json files
        input: PathBuf,

        /// Zero-based person index (default: every person)
        #[arg(long, short)]
        person: Option<usize>,

        /// Real stature in centimeters to scale to
        #[arg(long, short = 't')]
        target_height: Option<f64>,

        /// TOML file with measurement parameters
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Write the JSON report to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Evaluate the waist scan on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Display rig statistics and resolved landmarks
    Info {
        /// Rig JSON file, or a directory of person_<n>_rig.json files
        input: PathBuf,

        /// Zero-based person index
        #[arg(long, short, default_value = "0")]
        person: usize,
    },

    /// Measure a horizontal section of the mesh
    Section {
        /// Rig JSON file, or a directory of person_<n>_rig.json files
        input: PathBuf,

        /// Zero-based person index
        #[arg(long, short, default_value = "0")]
        person: usize,

        /// Section height in mesh units (meters)
        #[arg(long, required_unless_present = "scan", conflicts_with = "scan")]
        level: Option<f64>,

        /// Band half-thickness in meters
        #[arg(long, default_value = "0.02")]
        thickness: f64,

        /// Scan for the smallest section between two heights
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], allow_negative_numbers = true)]
        scan: Option<Vec<f64>>,

        /// Number of levels sampled by --scan
        #[arg(long, default_value = "30")]
        steps: usize,
    },

    /// List every measurement with its unit and category
    Schema,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "body_metrics=info",
            2 => "body_metrics=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Measure {
            input,
            person,
            target_height,
            config,
            output,
            sequential,
        } => measure::run(
            input,
            *person,
            *target_height,
            config.as_deref(),
            output.as_deref(),
            *sequential,
            &cli,
        ),
        Commands::Info { input, person } => info::run(input, *person, &cli),
        Commands::Section {
            input,
            person,
            level,
            thickness,
            scan,
            steps,
        } => section::run(input, *person, *level, *thickness, scan.as_deref(), *steps, &cli),
        Commands::Schema => schema::run(&cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(err) = e.downcast_ref::<body_metrics::MeasurementError>() {
                eprintln!("{}: {}", "Error".red().bold(), err);
                eprintln!("  {}: {}", "Code".cyan(), err.code());
                if let Some(help) = err.help() {
                    eprintln!("  {}: {}", "Suggestion".green(), help);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
