//! Phase delay of each phase step of a single transducer.

use super::common::{conditions, print_json, progress_bar};
use aerosonic_analysis::{estimate_phase_delay, remove_dc};
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{SeriesKind, read_column, scan_indexed, write_table};
use clap::Args;
use std::f64::consts::{PI, TAU};
use std::path::PathBuf;

#[derive(Args)]
pub struct PhaseArgs {
    /// Directory of phase<n>.csv captures, including the phase0.csv reference
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Phase steps per cycle of the driver
    #[arg(long, default_value = "256")]
    levels: u32,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: PhaseArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    if args.levels == 0 {
        anyhow::bail!("--levels must be positive");
    }
    let cond = conditions(&args.dir)?;
    let dt = cond.sample_interval();

    let reference_path = args.dir.join(SeriesKind::Phase.file_name(0));
    let reference = remove_dc(&read_column(&reference_path, &config.signal_column)?);
    if reference.len() < 2 {
        anyhow::bail!("{}: reference capture is too short", reference_path.display());
    }

    let captures = scan_indexed(&args.dir, SeriesKind::Phase)?;
    let pb = progress_bar(captures.len(), "phase");
    let mut rows = Vec::with_capacity(captures.len());
    for (step, path) in &captures {
        let signal = remove_dc(&read_column(path, &config.signal_column)?);
        if signal.len() != reference.len() {
            anyhow::bail!(
                "{}: {} samples, reference has {}",
                path.display(),
                signal.len(),
                reference.len()
            );
        }
        let phase = estimate_phase_delay(&signal, &reference, dt, config.carrier_period);
        let ideal = TAU * f64::from(step % args.levels) / f64::from(args.levels);
        let error = wrap(phase - ideal);
        tracing::debug!(step, phase, error, "phase step");
        rows.push([f64::from(*step), phase, ideal, error]);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(output) = &args.output {
        write_table(output, &["step", "phase", "ideal", "error"], &rows)?;
    }

    let count = rows.len().max(1) as f64;
    let mean_abs_error = rows.iter().map(|r| r[3].abs()).sum::<f64>() / count;
    let max_abs_error = rows.iter().map(|r| r[3].abs()).fold(0.0, f64::max);
    print_json(&serde_json::json!({
        "points": rows.len(),
        "mean_abs_error": mean_abs_error,
        "max_abs_error": max_abs_error,
    }))
}

/// Wrap a phase difference into `(−π, π]`.
fn wrap(diff: f64) -> f64 {
    let w = diff.rem_euclid(TAU);
    if w > PI { w - TAU } else { w }
}
