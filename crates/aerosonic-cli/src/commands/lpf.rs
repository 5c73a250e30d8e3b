//! Response of the phase low-pass filter.

use super::common::{print_json, with_suffix};
use aerosonic_analysis::fir::{self, PHASE_LPF, PHASE_LPF_GAIN};
use aerosonic_io::{read_numbers, write_table};
use clap::Args;
use std::f64::consts::PI;
use std::path::PathBuf;

#[derive(Args)]
pub struct LpfArgs {
    /// File of filter taps separated by commas or whitespace; the driver's filter when absent
    #[arg(long, value_name = "FILE")]
    coeffs: Option<PathBuf>,

    /// Sample rate of the frequency axis in Hz
    #[arg(long, default_value = "20000")]
    fs: f64,

    /// Frequency points of the response
    #[arg(long, default_value = "512")]
    points: usize,

    /// Length of the step input in samples
    #[arg(long, default_value = "500")]
    samples: usize,

    /// Last sample at 0; the input is π after it
    #[arg(long, default_value = "200")]
    step_at: usize,

    /// DC gain the output is normalized by
    #[arg(long, default_value_t = PHASE_LPF_GAIN)]
    gain: f64,

    /// Prefix of the output tables (<prefix>_response.csv, <prefix>_step.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: LpfArgs) -> anyhow::Result<()> {
    if args.gain == 0.0 || !args.gain.is_finite() {
        anyhow::bail!("--gain must be finite and non-zero");
    }
    let coeffs = match &args.coeffs {
        Some(path) => read_numbers(path)?,
        None => PHASE_LPF.to_vec(),
    };
    if coeffs.is_empty() {
        anyhow::bail!("filter has no taps");
    }
    tracing::debug!(taps = coeffs.len(), "filter loaded");

    let response: Vec<[f64; 2]> = fir::frequency_response(&coeffs, args.points, args.fs)
        .into_iter()
        .map(|(f, h)| [f, 20.0 * (h.norm() / args.gain).log10()])
        .collect();

    let input = step_input(args.samples, args.step_at);
    let filtered = fir::filter(&coeffs, &input);
    let step: Vec<[f64; 3]> = input
        .iter()
        .zip(&filtered)
        .enumerate()
        .map(|(n, (&x, &y))| [n as f64, x, y / args.gain])
        .collect();

    if let Some(prefix) = &args.output {
        write_table(
            with_suffix(prefix, "_response.csv"),
            &["frequency", "magnitude_db"],
            &response,
        )?;
        write_table(with_suffix(prefix, "_step.csv"), &["n", "input", "filtered"], &step)?;
    }

    print_json(&serde_json::json!({
        "taps": coeffs.len(),
        "dc_gain_db": response.first().map(|r| r[1]),
        "cutoff_3db_hz": cutoff(&response, -3.0),
        "final_value": step.last().map(|s| s[2]),
    }))
}

/// Phase step from 0 to π, taking effect on the sample after `step_at`.
fn step_input(samples: usize, step_at: usize) -> Vec<f64> {
    (0..samples)
        .map(|n| if n > step_at { PI } else { 0.0 })
        .collect()
}

/// First frequency where the response falls below `level_db`.
fn cutoff(response: &[[f64; 2]], level_db: f64) -> Option<f64> {
    response.iter().find(|r| r[1] < level_db).map(|r| r[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_starts_after_step_at() {
        let input = step_input(500, 200);
        assert_eq!(input.len(), 500);
        assert_eq!(input[200], 0.0);
        assert_eq!(input[201], PI);
        assert_eq!(input.iter().filter(|&&v| v == PI).count(), 299);
    }

    #[test]
    fn cutoff_finds_first_crossing() {
        let response = [[0.0, 0.0], [10.0, -1.0], [20.0, -4.0], [30.0, -2.0]];
        assert_eq!(cutoff(&response, -3.0), Some(20.0));
        assert_eq!(cutoff(&response, -10.0), None);
    }
}
