//! Spread of amplitude and phase across the transducers of several devices.
//!
//! Every transducer is captured on its own at a fixed depth. Amplitudes are
//! pooled directly; phases are first detrended per device by a fitted plane,
//! which removes the geometric path difference to the microphone.

use super::common::{carrier, conditions, finite_range, print_json, progress_bar, with_suffix};
use aerosonic_analysis::{
    FitOptions, acoustics, fit_plane,
    stats::{self, Normal},
};
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{Position, scan_devices, scan_transducers, write_table};
use clap::Args;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct IndividualArgs {
    /// Directory of dev<n> folders, each holding one folder per transducer
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Prefix of the output tables (<prefix>_amp.csv, <prefix>_phase.csv, …)
    #[arg(short, long, default_value = "individual")]
    output: PathBuf,
}

struct Sample {
    device: u32,
    pos: Position,
    amp: f64,
    phase: f64,
    residual: f64,
}

pub fn run(args: IndividualArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let cond = conditions(&args.root)?;
    let devices = scan_devices(&args.root)?;
    if devices.is_empty() {
        anyhow::bail!("{}: no dev<n> folders", args.root.display());
    }

    let mut per_device = Vec::with_capacity(devices.len());
    for (device, dir) in &devices {
        let captures: Vec<(Position, PathBuf)> = scan_transducers(dir)?
            .into_iter()
            .filter(|(p, _)| p.depth_mm() == config.plane_depth_mm)
            .collect();
        per_device.push((*device, captures));
    }
    let total: usize = per_device.iter().map(|(_, c)| c.len()).sum();

    let pb = progress_bar(total, "transducers");
    let mut samples = Vec::with_capacity(total);
    let mut planes = Vec::new();
    for (device, captures) in &per_device {
        let start = samples.len();
        for (pos, path) in captures {
            let feature = carrier(path, &cond, config)?;
            samples.push(Sample {
                device: *device,
                pos: *pos,
                amp: acoustics::rms_pressure(feature.magnitude, cond.mv_per_pa),
                phase: feature.phase,
                residual: f64::NAN,
            });
            pb.inc(1);
        }
        detrend_device(*device, &mut samples[start..], &mut planes);
    }
    pb.finish_and_clear();

    let amps: Vec<f64> = samples.iter().map(|s| s.amp).collect();
    let residuals: Vec<f64> = samples
        .iter()
        .map(|s| s.residual)
        .filter(|r| r.is_finite())
        .collect();

    write_samples(&args.output, &samples)?;
    let amp_fit = stats::fit_normal(&amps);
    let phase_fit = stats::fit_normal(&residuals);
    let bins = config.histogram_bins;
    if let Some(fit) = amp_fit {
        write_histogram(
            &with_suffix(&args.output, "_amp_hist.csv"),
            &amps,
            fit,
            bins,
            (0.0, config.amplitude_histogram_max),
        )?;
    }
    if let Some(fit) = phase_fit {
        write_histogram(
            &with_suffix(&args.output, "_phase_hist.csv"),
            &residuals,
            fit,
            bins,
            (-PI, PI),
        )?;
    }

    print_json(&serde_json::json!({
        "transducers": samples.len(),
        "amplitude": summary(&amps, amp_fit),
        "phase": summary(&residuals, phase_fit),
        "planes": planes,
    }))
}

/// Fit a plane to one device's phases and store the residuals.
fn detrend_device(device: u32, samples: &mut [Sample], planes: &mut Vec<serde_json::Value>) {
    let points: Vec<(f64, f64, Option<f64>)> = samples
        .iter()
        .map(|s| (s.pos.x, s.pos.y, Some(s.phase)))
        .collect();
    match fit_plane(&points, None, &FitOptions::default()) {
        Ok((plane, _)) => {
            for s in samples.iter_mut() {
                s.residual = plane.detrend(s.pos.x, s.pos.y, s.phase);
            }
            tracing::debug!(device, a = plane.a, b = plane.b, d = plane.d, "phase plane");
            planes.push(serde_json::json!({
                "device": device,
                "a": plane.a,
                "b": plane.b,
                "d": plane.d,
            }));
        }
        Err(e) => tracing::warn!(device, error = %e, "phase plane fit failed, device skipped"),
    }
}

fn write_samples(prefix: &Path, samples: &[Sample]) -> anyhow::Result<()> {
    let amp_rows: Vec<[f64; 4]> = samples
        .iter()
        .map(|s| [f64::from(s.device), s.pos.x, s.pos.y, s.amp])
        .collect();
    write_table(
        with_suffix(prefix, "_amp.csv"),
        &["device", "x", "y", "amp"],
        &amp_rows,
    )?;

    let phase_rows: Vec<[f64; 5]> = samples
        .iter()
        .map(|s| [f64::from(s.device), s.pos.x, s.pos.y, s.phase, s.residual])
        .collect();
    write_table(
        with_suffix(prefix, "_phase.csv"),
        &["device", "x", "y", "phase", "residual"],
        &phase_rows,
    )?;
    Ok(())
}

/// Histogram with the fitted normal density scaled to counts.
fn write_histogram(
    path: &Path,
    values: &[f64],
    fit: Normal,
    bins: usize,
    range: (f64, f64),
) -> anyhow::Result<()> {
    let counts = stats::histogram(values, bins, range);
    let edges = stats::bin_edges(bins, range);
    let width = (range.1 - range.0) / bins as f64;
    let n = values.len() as f64;
    let rows: Vec<[f64; 4]> = counts
        .iter()
        .zip(edges.windows(2))
        .map(|(&count, edge)| {
            let center = (edge[0] + edge[1]) / 2.0;
            [edge[0], edge[1], count as f64, n * width * fit.pdf(center)]
        })
        .collect();
    write_table(path, &["lo", "hi", "count", "expected"], &rows)?;
    Ok(())
}

fn summary(values: &[f64], fit: Option<Normal>) -> serde_json::Value {
    let (min, max) = finite_range(values).map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));
    serde_json::json!({
        "count": values.len(),
        "min": min,
        "max": max,
        "mean": fit.map(|f| f.mean),
        "std_dev": fit.map(|f| f.std_dev),
    })
}
