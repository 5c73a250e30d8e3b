//! Duty-ratio response of a single transducer.

use super::common::{carrier, carrier_rms, conditions, power_fit_options, print_json, progress_bar};
use aerosonic_analysis::{fit::sine_power, fit_sine_power, stats};
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{SeriesKind, scan_indexed, write_table};
use anyhow::Context;
use clap::Args;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct DutyArgs {
    /// Directory of amp<n>.csv microphone captures
    #[arg(value_name = "AMP_DIR")]
    amp_dir: PathBuf,

    /// Directory of input<n>.csv drive signal captures
    #[arg(long, value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: DutyArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (duties, rms) = amplitude_series(&args.amp_dir, config)?;
    let max_rms = rms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let normalized =
        stats::normalize(&rms).context("microphone amplitude is constant over the sweep")?;

    let x: Vec<f64> = duties.iter().map(|&d| config.duty_angle(d)).collect();
    let fit = fit_sine_power(
        &x,
        &normalized,
        Some(config.initial_exponent),
        &power_fit_options(config),
    )?;
    let exponent = fit.params[0];
    tracing::info!(exponent, evaluations = fit.evaluations, "fitted duty response");

    let input = match &args.input {
        Some(dir) => Some(input_series(dir, config)?),
        None => None,
    };

    if let Some(output) = &args.output {
        let mut header = vec!["duty", "x", "rms", "normalized", "theory", "fit"];
        if input.is_some() {
            header.push("input");
        }
        let rows: Vec<Vec<f64>> = duties
            .iter()
            .zip(&x)
            .zip(rms.iter().zip(&normalized))
            .map(|((&duty, &xi), (&r, &n))| {
                let mut row = vec![f64::from(duty), xi, r, n, xi.sin(), sine_power(xi, exponent)];
                if let Some(input) = &input {
                    row.push(input.get(&duty).copied().unwrap_or(f64::NAN));
                }
                row
            })
            .collect();
        write_table(output, &header, &rows)?;
    }

    print_json(&serde_json::json!({
        "points": duties.len(),
        "max_rms_pa": max_rms,
        "exponent": exponent,
        "std_error": fit.std_errors()[0],
        "evaluations": fit.evaluations,
    }))
}

/// RMS pressure of every `amp<n>.csv` in `dir`, ordered by duty.
fn amplitude_series(dir: &Path, config: &AnalysisConfig) -> anyhow::Result<(Vec<u32>, Vec<f64>)> {
    let cond = conditions(dir)?;
    let captures = scan_indexed(dir, SeriesKind::Amp)?;
    if captures.len() < 2 {
        anyhow::bail!(
            "{}: found {} amp<n>.csv captures, need at least two",
            dir.display(),
            captures.len()
        );
    }

    let pb = progress_bar(captures.len(), "amp");
    let mut duties = Vec::with_capacity(captures.len());
    let mut rms = Vec::with_capacity(captures.len());
    for (duty, path) in &captures {
        duties.push(*duty);
        rms.push(carrier_rms(path, &cond, config)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok((duties, rms))
}

/// Normalized drive amplitude of every `input<n>.csv` in `dir`, keyed by duty.
fn input_series(dir: &Path, config: &AnalysisConfig) -> anyhow::Result<BTreeMap<u32, f64>> {
    let cond = conditions(dir)?;
    let captures = scan_indexed(dir, SeriesKind::Input)?;

    let pb = progress_bar(captures.len(), "input");
    let mut amplitudes = Vec::with_capacity(captures.len());
    for (_, path) in &captures {
        amplitudes.push(carrier(path, &cond, config)?.magnitude);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let normalized =
        stats::normalize(&amplitudes).context("drive amplitude is constant over the sweep")?;
    Ok(captures
        .iter()
        .map(|(duty, _)| *duty)
        .zip(normalized)
        .collect())
}
