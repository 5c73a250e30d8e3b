//! RMS pressure map of an xy scan.

use super::common::{carrier_rms, conditions, print_json, progress_bar};
use aerosonic_analysis::xcorr::argmax;
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{scan_positions, write_table};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct FieldArgs {
    /// Directory of x<f>y<f>z<f>.csv captures
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Output CSV grid (rows by y, columns by x)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: FieldArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let cond = conditions(&args.dir)?;
    let captures = scan_positions(&args.dir)?;
    if captures.is_empty() {
        anyhow::bail!("{}: no x<f>y<f>z<f>.csv captures", args.dir.display());
    }

    let xs = axis(captures.iter().map(|(p, _)| p.x));
    let ys = axis(captures.iter().map(|(p, _)| p.y));
    let mut grid = vec![vec![f64::NAN; xs.len()]; ys.len()];

    let pb = progress_bar(captures.len(), "field");
    let mut points = Vec::with_capacity(captures.len());
    for (pos, path) in &captures {
        let rms = carrier_rms(path, &cond, config)?;
        pb.inc(1);
        let (Some(i), Some(j)) = (index_of(&xs, pos.x), index_of(&ys, pos.y)) else {
            continue;
        };
        grid[j][i] = rms;
        points.push((pos.x, pos.y, rms));
    }
    pb.finish_and_clear();

    if let Some(output) = &args.output {
        let header: Vec<String> = std::iter::once("y\\x".to_string())
            .chain(xs.iter().map(|x| x.to_string()))
            .collect();
        let rows: Vec<Vec<f64>> = ys
            .iter()
            .zip(&grid)
            .map(|(&y, row)| std::iter::once(y).chain(row.iter().copied()).collect())
            .collect();
        write_table(output, &header, &rows)?;
    }

    let values: Vec<f64> = points.iter().map(|p| p.2).collect();
    let peak = argmax(&values).map(|i| points[i]);
    let resolution = if xs.len() > 1 { xs[1] - xs[0] } else { f64::NAN };
    print_json(&serde_json::json!({
        "points": points.len(),
        "nx": xs.len(),
        "ny": ys.len(),
        "resolution_mm": resolution,
        "max_pa": peak.map(|p| p.2),
        "max_at": peak.map(|p| [p.0, p.1]),
    }))
}

/// Sorted distinct values.
fn axis(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

fn index_of(axis: &[f64], value: f64) -> Option<usize> {
    axis.binary_search_by(|a| a.total_cmp(&value)).ok()
}
