//! Atmospheric absorption coefficient.

use super::common::print_json;
use aerosonic_analysis::AttenuationParameters;
use aerosonic_io::write_table;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AttenuationArgs {
    /// Frequencies in Hz
    #[arg(long, num_args = 1.., default_value = "40000")]
    frequency: Vec<f64>,

    /// Relative humidity in percent
    #[arg(long, default_value = "50")]
    humidity: f64,

    /// Ambient pressure in Pa
    #[arg(long, default_value = "101325")]
    pressure: f64,

    /// Reference pressure in Pa
    #[arg(long, default_value = "101325")]
    reference_pressure: f64,

    /// Temperature in K
    #[arg(long, default_value = "293.15")]
    temperature: f64,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: AttenuationArgs) -> anyhow::Result<()> {
    if args.temperature <= 0.0 {
        anyhow::bail!("--temperature is in kelvin and must be positive");
    }
    let params = AttenuationParameters {
        frequency: 0.0,
        relative_humidity: args.humidity,
        pressure: args.pressure,
        reference_pressure: args.reference_pressure,
        temperature: args.temperature,
    };

    let rows: Vec<[f64; 2]> = args
        .frequency
        .iter()
        .map(|&f| [f, params.with_frequency(f).coefficient()])
        .collect();

    if let Some(output) = &args.output {
        write_table(output, &["frequency", "alpha"], &rows)?;
    }

    let entries: Vec<serde_json::Value> = rows
        .iter()
        .map(|[f, alpha]| serde_json::json!({ "frequency": f, "alpha": alpha }))
        .collect();
    print_json(&serde_json::Value::Array(entries))
}
