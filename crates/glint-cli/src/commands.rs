//! Subcommand implementations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use glint::export::PlyExport;
use glint::{load_mesh, report, AnalysisConfig, Scene, SunConfig};
use tracing::info;

use crate::AnalysisArgs;

/// Camera flags for `analyze`.
pub struct CameraOverrides {
    pub camera: Option<[f64; 3]>,
    pub target: Option<[f64; 3]>,
}

/// Orbit flags for `sweep`.
pub struct OrbitOverrides {
    pub distance: Option<f64>,
    pub start: Option<f64>,
    pub step: Option<f64>,
    pub count: Option<usize>,
    pub elevation: Option<f64>,
}

/// Load the config file (if any) and apply command-line overrides.
fn resolve_config(args: &AnalysisArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(scale) = args.scale {
        config.mesh.scale = scale;
    }
    if let Some(direction) = args.sun {
        config.sun.direction = direction;
    }
    if let Some(azimuth) = args.sun_azimuth {
        config.sun.direction = SunConfig::from_azimuth(azimuth).direction;
    }
    if let Some(v) = args.fov_x {
        config.camera.fov_x_deg = v;
    }
    if let Some(v) = args.fov_y {
        config.camera.fov_y_deg = v;
    }
    if let Some(v) = args.max_viewing_angle {
        config.camera.max_viewing_angle_deg = v;
    }
    if let Some(v) = args.max_sun_angle {
        config.sun.max_sun_angle_deg = v;
    }
    if let Some(v) = args.reflection_angle {
        config.sun.min_reflection_angle_deg = v;
    }
    if let Some(mode) = args.occlusion {
        config.sun.occlusion = mode.into();
    }

    Ok(config)
}

fn load_scene(path: &Path, scale: f64) -> Result<Scene> {
    let mesh =
        load_mesh(path, scale).with_context(|| format!("failed to load mesh {}", path.display()))?;
    Ok(Scene::new(mesh))
}

pub fn info(path: &Path, scale: f64) -> Result<()> {
    let mesh =
        load_mesh(path, scale).with_context(|| format!("failed to load mesh {}", path.display()))?;
    let bounds = mesh.bounds();
    let extents = bounds.extents();
    let center = bounds.center();

    println!("mesh: {}", path.display());
    println!("  Scale: {scale}");
    println!("  Vertices: {}", mesh.num_vertices());
    println!("  Patches: {}", mesh.num_faces());
    println!("  Total area: {:.4}", mesh.total_area());
    println!(
        "  Extent: {:.4} x {:.4} x {:.4}",
        extents.x, extents.y, extents.z
    );
    println!("  Center: ({:.4}, {:.4}, {:.4})", center.x, center.y, center.z);

    let degenerate = mesh.face_areas().iter().filter(|&&a| a == 0.0).count();
    if degenerate > 0 {
        println!("  Degenerate faces: {degenerate}");
    }
    Ok(())
}

pub fn analyze(
    path: &Path,
    args: &AnalysisArgs,
    overrides: CameraOverrides,
    out: Option<&Path>,
    ply: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = resolve_config(args)?;
    if let Some(position) = overrides.camera {
        config.camera.position = position;
    }
    if let Some(target) = overrides.target {
        config.camera.target = Some(target);
    }
    config.validate().context("invalid analysis settings")?;

    let scene = load_scene(path, config.mesh.scale)?;
    let output = scene
        .analyze(&config.camera, &config.sun)
        .context("visibility analysis failed")?;
    info!(
        visible = output.stats.final_visible,
        total = output.stats.total_patches,
        "analysis complete"
    );

    let mut writer: Box<dyn Write> = match out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("failed to create {}", p.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    if json {
        report::write_json(&mut writer, &output.stats)?;
    } else {
        report::write_summary(&mut writer, &output.stats)?;
    }
    writer.flush()?;

    if let Some(p) = ply {
        PlyExport::new(scene.mesh(), &output.mask)?
            .export(p)
            .with_context(|| format!("failed to write {}", p.display()))?;
        info!(path = %p.display(), "wrote PLY");
    }
    Ok(())
}

pub fn sweep(
    path: &Path,
    args: &AnalysisArgs,
    overrides: OrbitOverrides,
    out_dir: &Path,
    json: bool,
) -> Result<()> {
    let mut config = resolve_config(args)?;
    let orbit = &mut config.sweep;
    if let Some(v) = overrides.distance {
        orbit.camera_distance = v;
    }
    if let Some(v) = overrides.start {
        orbit.start_deg = v;
    }
    if let Some(v) = overrides.step {
        orbit.step_deg = v;
    }
    if let Some(v) = overrides.count {
        orbit.count = v;
    }
    if let Some(v) = overrides.elevation {
        orbit.elevation_deg = v;
    }
    config.validate().context("invalid analysis settings")?;

    let scene = load_scene(path, config.mesh.scale)?;
    let cameras = config.sweep.cameras(&config.camera);
    let outcome = scene
        .sweep(&cameras, &config.sun)
        .context("visibility sweep failed")?;

    for run in &outcome.runs {
        info!(
            azimuth_deg = config.sweep.azimuth_deg(run.index),
            visible = run.stats.final_visible,
            "camera position done"
        );
    }

    let written = report::save_sweep(out_dir, &outcome, &config.sweep, scene.mesh())
        .with_context(|| format!("failed to write results to {}", out_dir.display()))?;
    info!(files = written.len(), dir = %out_dir.display(), "results saved");

    let mut stdout = io::stdout().lock();
    if json {
        report::write_json(&mut stdout, &outcome.coverage)?;
    } else {
        report::write_combined(&mut stdout, &outcome.coverage)?;
    }
    Ok(())
}
