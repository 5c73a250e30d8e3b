//! Saturation of arrays of several modules.
//!
//! A covered run attenuates the field so the microphone does not clip; its
//! duty series is scaled onto the uncovered run over the calibration duties,
//! where neither saturates.

use super::common::{carrier_rms, conditions, power_fit_options, print_json, progress_bar};
use aerosonic_analysis::{fit::scaled_sine_power, fit_scaled_sine_power, stats};
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{SeriesKind, scan_cover_folders, scan_indexed, write_table};
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct SaturationArgs {
    /// Directory holding saturation_<d1>x<d2>_z<z> and saturation_cover_<d1>x<d2>_z<z> runs
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Microphone depth in mm of the runs to analyze
    #[arg(long)]
    z: i64,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SaturationArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let mut runs = Vec::new();
    for (folder, path) in scan_cover_folders(&args.root)? {
        let cond = conditions(&path)?;
        let depth = cond.depth_mm().unwrap_or(i64::from(folder.z));
        if depth == args.z {
            runs.push((folder, path));
        }
    }
    if runs.is_empty() {
        anyhow::bail!(
            "no saturation_cover_* runs at z = {} mm under {}",
            args.z,
            args.root.display()
        );
    }

    let mut rows = Vec::new();
    let mut summaries = Vec::new();
    for (folder, covered_dir) in &runs {
        let uncovered_dir = args.root.join(folder.uncovered_name());
        let reference = duty_series(&uncovered_dir, config)?;
        let covered = duty_series(covered_dir, config)?;

        let ratio = stats::calibration_ratio(&reference, &covered, config.calibration_duties.clone())
            .filter(|r| r.is_finite())
            .with_context(|| {
                format!(
                    "{}: duties {}..{} missing from covered or uncovered run",
                    covered_dir.display(),
                    config.calibration_duties.start,
                    config.calibration_duties.end
                )
            })?;

        let mut x = Vec::new();
        let mut y = Vec::new();
        for (duty, &rms) in covered.iter().enumerate() {
            if rms.is_finite() {
                x.push(config.duty_angle(duty as u32));
                y.push(ratio * rms);
            }
        }
        let max_pa = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let fit = match fit_scaled_sine_power(&x, &y, Some((max_pa, 1.0)), &power_fit_options(config)) {
            Ok(fit) => Some(fit),
            Err(e) => {
                tracing::warn!(run = %folder.covered_name(), error = %e, "duty fit failed");
                None
            }
        };
        let (r, exponent) = fit
            .as_ref()
            .map_or((f64::NAN, f64::NAN), |f| (f.params[0], f.params[1]));
        tracing::info!(
            run = %folder.covered_name(),
            ratio,
            max_pa,
            exponent,
            "calibrated"
        );

        for (duty, &rms) in covered.iter().enumerate() {
            if rms.is_finite() {
                let xi = config.duty_angle(duty as u32);
                rows.push([
                    f64::from(folder.d1),
                    f64::from(folder.d2),
                    duty as f64,
                    rms,
                    ratio * rms,
                    scaled_sine_power(xi, r, exponent),
                ]);
            }
        }
        summaries.push(serde_json::json!({
            "d1": folder.d1,
            "d2": folder.d2,
            "modules": folder.modules(),
            "z": args.z,
            "ratio": ratio,
            "max_pa": max_pa,
            "r": r,
            "exponent": exponent,
        }));
    }

    if let Some(output) = &args.output {
        write_table(
            output,
            &["d1", "d2", "duty", "covered_rms", "scaled_rms", "fit"],
            &rows,
        )?;
    }

    print_json(&serde_json::Value::Array(summaries))
}

/// RMS pressure indexed by duty; duties without a capture are NaN.
fn duty_series(dir: &Path, config: &AnalysisConfig) -> anyhow::Result<Vec<f64>> {
    let cond = conditions(dir)?;
    let captures = within_duty_range(scan_indexed(dir, SeriesKind::Duty)?, config.max_duty);
    let len = captures.last().map_or(0, |(duty, _)| *duty as usize + 1);

    let pb = progress_bar(captures.len(), "duty");
    let mut series = vec![f64::NAN; len];
    for (duty, path) in &captures {
        series[*duty as usize] = carrier_rms(path, &cond, config)?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(series)
}

/// Drop captures whose duty exceeds `max_duty`; the series is indexed by duty.
fn within_duty_range(captures: Vec<(u32, PathBuf)>, max_duty: u32) -> Vec<(u32, PathBuf)> {
    captures
        .into_iter()
        .filter(|(duty, path)| {
            let keep = *duty <= max_duty;
            if !keep {
                tracing::warn!(path = %path.display(), duty, max_duty, "duty out of range, skipped");
            }
            keep
        })
        .collect()
}
