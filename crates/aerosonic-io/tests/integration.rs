//! Integration tests for aerosonic-io: scanning a measurement tree on disk.

use aerosonic_io::{
    Conditions, DEFAULT_SIGNAL_COLUMN, Position, SeriesKind, read_waveform, scan_cover_folders,
    scan_devices, scan_indexed, scan_positions, scan_transducers,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_capture(path: &Path, samples: &[f64]) {
    let mut text = String::from("Time [us],  A Max [mV]\n");
    for (i, s) in samples.iter().enumerate() {
        text.push_str(&format!("{i}, {s}\n"));
    }
    fs::write(path, text).unwrap();
}

// ---------------------------------------------------------------------------
// Indexed series
// ---------------------------------------------------------------------------

#[test]
fn indexed_series_sorted_numerically() {
    let dir = tempdir().unwrap();
    for n in [10, 2, 1, 100] {
        write_capture(&dir.path().join(SeriesKind::Amp.file_name(n)), &[0.0, 1.0]);
    }
    write_capture(&dir.path().join("input3.csv"), &[0.0, 1.0]);
    Conditions::new(1.0e6, 2, 1.0).save(dir.path().join("cond.txt")).unwrap();

    let found = scan_indexed(dir.path(), SeriesKind::Amp).unwrap();
    let indices: Vec<u32> = found.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![1, 2, 10, 100]);

    let inputs = scan_indexed(dir.path(), SeriesKind::Input).unwrap();
    assert_eq!(inputs.len(), 1);
}

#[test]
fn capture_and_conditions_make_waveform() {
    let dir = tempdir().unwrap();
    let cond = Conditions::new(2.0e6, 3, 4.0);
    cond.save(dir.path().join("cond.txt")).unwrap();
    write_capture(&dir.path().join("phase0.csv"), &[1.0, -1.0, 0.5]);

    let loaded = Conditions::load_dir(dir.path()).unwrap();
    assert_eq!(loaded, cond);

    let w = read_waveform(
        dir.path().join("phase0.csv"),
        DEFAULT_SIGNAL_COLUMN,
        loaded.sample_interval(),
    )
    .unwrap();
    assert_eq!(w.samples(), &[1.0, -1.0, 0.5]);
    assert_eq!(w.sample_rate(), 2.0e6);
}

// ---------------------------------------------------------------------------
// Positions and devices
// ---------------------------------------------------------------------------

#[test]
fn positions_in_flat_directory() {
    let dir = tempdir().unwrap();
    for (x, y) in [(-1.0, 0.0), (0.0, 0.0), (1.0, 2.0)] {
        let p = Position { x, y, z: 150.0 };
        write_capture(&dir.path().join(p.file_name()), &[0.0, 1.0]);
    }
    fs::write(dir.path().join("notes.csv"), "x\n").unwrap();

    let found = scan_positions(dir.path()).unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|(p, _)| p.depth_mm() == 150));
}

#[test]
fn devices_and_transducers() {
    let root = tempdir().unwrap();
    for dev in [1, 0] {
        let dev_dir = root.path().join(format!("dev{dev}"));
        for tr in 0..3 {
            let tr_dir = dev_dir.join(format!("tr{tr}"));
            fs::create_dir_all(&tr_dir).unwrap();
            let p = Position { x: f64::from(tr) * 10.16, y: 0.0, z: 200.0 };
            write_capture(&tr_dir.join(p.file_name()), &[0.0, 1.0]);
            let far = Position { z: 300.0, ..p };
            write_capture(&tr_dir.join(far.file_name()), &[0.0, 1.0]);
        }
    }
    fs::create_dir_all(root.path().join("misc")).unwrap();

    let devices = scan_devices(root.path()).unwrap();
    assert_eq!(devices.iter().map(|(d, _)| *d).collect::<Vec<_>>(), vec![0, 1]);

    let captures = scan_transducers(&devices[0].1).unwrap();
    assert_eq!(captures.len(), 6);
    assert_eq!(captures.iter().filter(|(p, _)| p.depth_mm() == 200).count(), 3);
}

// ---------------------------------------------------------------------------
// Saturation folders
// ---------------------------------------------------------------------------

#[test]
fn cover_folders_largest_first() {
    let root = tempdir().unwrap();
    for name in [
        "saturation_cover_1x1_z150",
        "saturation_1x1_z150",
        "saturation_cover_2x2_z150",
        "saturation_2x2_z150",
        "saturation_cover_1x2_z300",
    ] {
        fs::create_dir_all(root.path().join(name)).unwrap();
    }

    let found = scan_cover_folders(root.path()).unwrap();
    let modules: Vec<u32> = found.iter().map(|(f, _)| f.modules()).collect();
    assert_eq!(modules, vec![4, 2, 1]);
    assert!(root.path().join(found[0].0.uncovered_name()).is_dir());
}
