//! Directivity model table.

use aerosonic_analysis::{gain, gain_db};
use aerosonic_io::write_table;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DirectivityArgs {
    /// Number of angles from -90° to 90°
    #[arg(long, default_value = "181")]
    points: usize,

    /// Output CSV file; the table is printed when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: DirectivityArgs) -> anyhow::Result<()> {
    if args.points < 2 {
        anyhow::bail!("--points must be at least 2");
    }
    let rows = table(args.points);

    match &args.output {
        Some(output) => write_table(output, &["deg", "rad", "gain", "gain_db"], &rows)?,
        None => {
            println!("{:>8} {:>10} {:>10} {:>10}", "deg", "rad", "gain", "dB");
            for [deg, rad, g, db] in &rows {
                println!("{deg:>8.2} {rad:>10.5} {g:>10.5} {db:>10.3}");
            }
        }
    }
    Ok(())
}

fn table(points: usize) -> Vec<[f64; 4]> {
    let step = 180.0 / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let deg = -90.0 + step * i as f64;
            let rad = deg.to_radians();
            [deg, rad, gain(rad), gain_db(rad)]
        })
        .collect()
}
