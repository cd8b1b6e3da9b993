//! Human-readable and JSON reports.
//!
//! Text layouts:
//!
//! ```text
//! === Visibility Analysis Summary ===
//! Total patches: 49152
//! Geometric visible: 812 (1.7%)
//! Light illuminated: 640 (78.8% of geometric)
//! Reflection conditions met: 512 (63.1% of geometric)
//! Light unoccluded: 500 (61.6% of geometric)
//! Final visible: 500 (1.0% of total)
//! Visible area: 3.21 (1.1% of total area)
//! ```
//!
//! followed by a per-patch angle table, and for a sweep:
//!
//! ```text
//! Total patches: 49152
//! Visible patches from all angles: 9001
//! Coverage percentage: 18.31%
//! ...
//! ```

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use glint_mesh::SurfaceMesh;
use glint_visibility::{CombinedCoverage, SweepOutcome, SweepSettings, VisibilityStats};
use serde::Serialize;
use tracing::{info, warn};

use crate::export::ply::PlyExport;
use crate::Result;

/// File name of the combined coverage report in a sweep directory.
pub const COMBINED_STATS_FILE: &str = "combined_stats.txt";
/// File name of the combined visibility model in a sweep directory.
pub const COMBINED_PLY_FILE: &str = "combined_visibility.ply";

/// Report file name for a camera azimuth, e.g. `visibility_analysis_angle_030.txt`.
pub fn angle_file_name(azimuth_deg: f64) -> String {
    format!("visibility_analysis_angle_{:03}.txt", azimuth_deg.round() as i64)
}

/// Report file name carrying the configuration index,
/// e.g. `visibility_analysis_004_angle_001.60.txt`.
pub fn indexed_file_name(index: usize, azimuth_deg: f64) -> String {
    format!("visibility_analysis_{index:03}_angle_{azimuth_deg:06.2}.txt")
}

/// Per-configuration report names for the runs at `indices`.
///
/// Whole-degree names from [`angle_file_name`] are kept while they are
/// distinct. If any two collide (fractional or zero steps), every run is
/// named with [`indexed_file_name`] instead.
pub fn sweep_file_names(settings: &SweepSettings, indices: &[usize]) -> Vec<String> {
    let names: Vec<String> = indices
        .iter()
        .map(|&i| angle_file_name(settings.azimuth_deg(i)))
        .collect();
    let distinct: HashSet<&str> = names.iter().map(String::as_str).collect();
    if distinct.len() == names.len() {
        return names;
    }

    warn!(
        step_deg = settings.step_deg,
        "azimuths collide at whole degrees, naming reports by index"
    );
    indices
        .iter()
        .map(|&i| indexed_file_name(i, settings.azimuth_deg(i)))
        .collect()
}

/// Write the per-configuration summary and angle table.
pub fn write_summary(w: &mut impl Write, stats: &VisibilityStats) -> std::io::Result<()> {
    writeln!(w, "=== Visibility Analysis Summary ===")?;
    writeln!(w, "Total patches: {}", stats.total_patches)?;
    writeln!(
        w,
        "Geometric visible: {} ({:.1}%)",
        stats.geometric_visible,
        VisibilityStats::percent(stats.geometric_visible as f64, stats.total_patches as f64)
    )?;

    if stats.geometric_visible > 0 {
        for (label, count) in [
            ("Light illuminated", stats.sun_illuminated),
            ("Reflection conditions met", stats.reflection_ok),
            ("Light unoccluded", stats.sun_unoccluded),
        ] {
            writeln!(
                w,
                "{label}: {count} ({:.1}% of geometric)",
                stats.percent_of_geometric(count)
            )?;
        }
    }

    writeln!(
        w,
        "Final visible: {} ({:.1}% of total)",
        stats.final_visible,
        stats.visible_percent()
    )?;
    writeln!(
        w,
        "Visible area: {:.2} ({:.1}% of total area)",
        stats.visible_area,
        stats.area_percent()
    )?;

    if stats.final_visible > 0 {
        writeln!(w)?;
        writeln!(w, "=== Detailed Visibility Information ===")?;
        writeln!(
            w,
            "{:^12} | {:^16} | {:^16}",
            "Patch Index", "Incidence Angle", "Viewing Angle"
        )?;
        writeln!(w, "{}-+-{}-+-{}", "-".repeat(12), "-".repeat(16), "-".repeat(16))?;
        for (index, incidence, viewing) in stats.angle_rows() {
            writeln!(w, "{index:^12} | {incidence:^16.2} | {viewing:^16.2}")?;
        }
    }
    Ok(())
}

/// Write the union coverage of a sweep.
pub fn write_combined(w: &mut impl Write, coverage: &CombinedCoverage) -> std::io::Result<()> {
    writeln!(w, "Total patches: {}", coverage.total_patches)?;
    writeln!(w, "Visible patches from all angles: {}", coverage.visible_patches)?;
    writeln!(w, "Coverage percentage: {:.2}%", coverage.count_fraction * 100.0)?;
    writeln!(w, "Total area: {:.2}", coverage.total_area)?;
    writeln!(w, "Visible area: {:.2}", coverage.visible_area)?;
    writeln!(w, "Area coverage percentage: {:.2}%", coverage.area_fraction * 100.0)?;
    Ok(())
}

/// Summary as a string.
pub fn summary_string(stats: &VisibilityStats) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = write_summary(&mut buf, stats);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write any report value as pretty JSON.
pub fn write_json<T: Serialize>(w: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Write one summary to `path`.
pub fn save_summary(path: impl AsRef<Path>, stats: &VisibilityStats) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_summary(&mut writer, stats)?;
    writer.flush()?;
    Ok(())
}

/// Write every artifact of a sweep into `dir`:
/// one summary per camera, the combined report and the combined PLY.
///
/// Returns the paths written, in that order.
pub fn save_sweep(
    dir: impl AsRef<Path>,
    outcome: &SweepOutcome,
    settings: &SweepSettings,
    mesh: &SurfaceMesh,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(outcome.runs.len() + 2);

    let indices: Vec<usize> = outcome.runs.iter().map(|run| run.index).collect();
    for (run, name) in outcome.runs.iter().zip(sweep_file_names(settings, &indices)) {
        let path = dir.join(name);
        save_summary(&path, &run.stats)?;
        written.push(path);
    }

    let path = dir.join(COMBINED_STATS_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_combined(&mut writer, &outcome.coverage)?;
    writer.flush()?;
    written.push(path);

    let path = dir.join(COMBINED_PLY_FILE);
    PlyExport::new(mesh, &outcome.coverage.mask)?.export(&path)?;
    written.push(path);

    info!(dir = %dir.display(), files = written.len(), "sweep reports written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> VisibilityStats {
        let mut s = VisibilityStats::empty(10, 20.0);
        s.geometric_visible = 4;
        s.camera_unoccluded = 4;
        s.sun_illuminated = 3;
        s.reflection_ok = 2;
        s.sun_unoccluded = 2;
        s.final_visible = 2;
        s.visible_area = 5.0;
        s.visible_indices = vec![3, 7];
        s.incidence_angles = vec![0.0, std::f64::consts::FRAC_PI_4];
        s.viewing_angles = vec![std::f64::consts::FRAC_PI_6, 0.0];
        s
    }

    #[test]
    fn test_angle_file_name() {
        assert_eq!(angle_file_name(0.0), "visibility_analysis_angle_000.txt");
        assert_eq!(angle_file_name(30.0), "visibility_analysis_angle_030.txt");
        assert_eq!(angle_file_name(360.0), "visibility_analysis_angle_360.txt");
    }

    #[test]
    fn test_sweep_file_names_whole_degrees() {
        let settings = SweepSettings::default();
        let names = sweep_file_names(&settings, &[0, 3, 36]);
        assert_eq!(
            names,
            [
                "visibility_analysis_angle_000.txt",
                "visibility_analysis_angle_030.txt",
                "visibility_analysis_angle_360.txt",
            ]
        );
    }

    #[test]
    fn test_sweep_file_names_fractional_step() {
        let settings = SweepSettings {
            step_deg: 0.4,
            count: 3,
            ..Default::default()
        };
        let names = sweep_file_names(&settings, &[0, 1, 2]);
        assert_eq!(
            names,
            [
                "visibility_analysis_000_angle_000.00.txt",
                "visibility_analysis_001_angle_000.40.txt",
                "visibility_analysis_002_angle_000.80.txt",
            ]
        );
    }

    #[test]
    fn test_summary_text() {
        let text = summary_string(&sample_stats());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Visibility Analysis Summary ===");
        assert_eq!(lines[1], "Total patches: 10");
        assert_eq!(lines[2], "Geometric visible: 4 (40.0%)");
        assert_eq!(lines[3], "Light illuminated: 3 (75.0% of geometric)");
        assert_eq!(lines[4], "Reflection conditions met: 2 (50.0% of geometric)");
        assert_eq!(lines[5], "Light unoccluded: 2 (50.0% of geometric)");
        assert_eq!(lines[6], "Final visible: 2 (20.0% of total)");
        assert_eq!(lines[7], "Visible area: 5.00 (25.0% of total area)");
        assert!(text.contains("=== Detailed Visibility Information ==="));
        assert!(text.contains(&format!("{:^12} | {:^16.2} | {:^16.2}", 3, 0.0, 30.0)));
        assert!(text.contains(&format!("{:^12} | {:^16.2} | {:^16.2}", 7, 45.0, 0.0)));
    }

    #[test]
    fn test_summary_without_geometric_hits() {
        let text = summary_string(&VisibilityStats::empty(5, 1.0));
        assert!(!text.contains("Light illuminated"));
        assert!(!text.contains("Detailed"));
        assert!(text.contains("Final visible: 0 (0.0% of total)"));
    }

    #[test]
    fn test_combined_text() {
        let coverage = CombinedCoverage {
            mask: vec![true, false, false, false].into(),
            visible_patches: 1,
            total_patches: 4,
            count_fraction: 0.25,
            visible_area: 1.5,
            total_area: 6.0,
            area_fraction: 0.25,
            configurations: 3,
        };
        let mut buf = Vec::new();
        write_combined(&mut buf, &coverage).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Total patches: 4\n\
             Visible patches from all angles: 1\n\
             Coverage percentage: 25.00%\n\
             Total area: 6.00\n\
             Visible area: 1.50\n\
             Area coverage percentage: 25.00%\n"
        );
    }

    #[test]
    fn test_json_stats() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample_stats()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["final_visible"], 2);
        assert_eq!(value["visible_indices"][1], 7);
    }
}
