//! CLI for pimon — record system & power telemetry on Raspberry Pi-class hosts.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pimon")]
#[command(about = "pimon — system & software-reported power monitor")]
#[command(version = pimon_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a telemetry time series to a CSV file
    Record {
        /// Sample interval in seconds
        #[arg(long, default_value_t = 1.0)]
        interval: f64,

        /// Stop after this many seconds (0 = run until Ctrl+C)
        #[arg(long, default_value_t = 0.0)]
        duration: f64,

        /// CSV output path
        #[arg(long, default_value = "pimon_metrics.csv")]
        out: PathBuf,

        /// Disable vcgencmd queries entirely
        #[arg(long)]
        no_vcgencmd: bool,
    },

    /// List source probes and their availability on this host
    Probes {
        /// Disable vcgencmd queries entirely
        #[arg(long)]
        no_vcgencmd: bool,
    },

    /// Take one full probe pass and print it as JSON
    Snapshot {
        /// Write the JSON here instead of stdout
        #[arg(long)]
        output: Option<String>,

        /// Disable vcgencmd queries entirely
        #[arg(long)]
        no_vcgencmd: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            interval,
            duration,
            out,
            no_vcgencmd,
        } => commands::record::run(interval, duration, &out, no_vcgencmd),
        Commands::Probes { no_vcgencmd } => commands::probes::run(no_vcgencmd),
        Commands::Snapshot {
            output,
            no_vcgencmd,
        } => commands::snapshot::run(output.as_deref(), no_vcgencmd),
    }
}
