//! Aerosonic CLI - Analysis of ultrasonic transducer array measurements.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aerosonic")]
#[command(author, version, about = "Ultrasonic transducer measurement analysis", long_about = None)]
struct Cli {
    /// Analysis settings file (TOML); defaults apply when absent
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the duty-ratio response of a single transducer
    Duty(commands::duty::DutyArgs),

    /// Measure phase delay of each phase step against phase0
    Phase(commands::phase::PhaseArgs),

    /// Calibrate covered saturation runs and fit their duty response
    Saturation(commands::saturation::SaturationArgs),

    /// Map RMS pressure over an xy scan
    Field(commands::field::FieldArgs),

    /// Per-transducer amplitude and phase spread across devices
    Individual(commands::individual::IndividualArgs),

    /// Tabulate the T4010A1 directivity model
    Directivity(commands::directivity::DirectivityArgs),

    /// Atmospheric attenuation coefficient
    Attenuation(commands::attenuation::AttenuationArgs),

    /// Response of the phase low-pass filter
    Lpf(commands::lpf::LpfArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::common::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Duty(args) => commands::duty::run(args, &config),
        Commands::Phase(args) => commands::phase::run(args, &config),
        Commands::Saturation(args) => commands::saturation::run(args, &config),
        Commands::Field(args) => commands::field::run(args, &config),
        Commands::Individual(args) => commands::individual::run(args, &config),
        Commands::Directivity(args) => commands::directivity::run(args),
        Commands::Attenuation(args) => commands::attenuation::run(args),
        Commands::Lpf(args) => commands::lpf::run(args),
    }
}
