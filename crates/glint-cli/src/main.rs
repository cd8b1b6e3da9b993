//! glint CLI - visibility and coverage analysis for surface meshes
//!
//! ```text
//! glint info model/itokawa.obj
//! glint analyze model/itokawa.obj --camera 600,0,0 --sun-azimuth 30
//! glint sweep model/itokawa.obj --out visibility_results/sun_angle_000
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "glint")]
#[command(about = "Camera/sun visibility and coverage analysis for surface meshes", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for the parallel stages (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show mesh statistics
    Info {
        /// Mesh file (.obj)
        mesh: PathBuf,
        /// Uniform scale applied on load
        #[arg(long, default_value_t = 0.1)]
        scale: f64,
    },
    /// Analyze a single camera/sun configuration
    Analyze {
        /// Mesh file (.obj)
        mesh: PathBuf,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Camera position as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        camera: Option<[f64; 3]>,
        /// Camera aim point as x,y,z (default: origin)
        #[arg(long, value_parser = parse_vec3)]
        target: Option<[f64; 3]>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also write a colored PLY of the visible patches
        #[arg(long)]
        ply: Option<PathBuf>,
        /// Print stats as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sweep the camera around the body and report coverage
    Sweep {
        /// Mesh file (.obj)
        mesh: PathBuf,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Output directory for per-angle reports, combined stats and PLY
        #[arg(short, long)]
        out: PathBuf,
        /// Camera distance from the origin
        #[arg(long)]
        distance: Option<f64>,
        /// Azimuth of the first camera (degrees)
        #[arg(long)]
        start: Option<f64>,
        /// Azimuth step between cameras (degrees)
        #[arg(long)]
        step: Option<f64>,
        /// Number of camera positions
        #[arg(long)]
        count: Option<usize>,
        /// Orbit elevation above the XY plane (degrees)
        #[arg(long)]
        elevation: Option<f64>,
        /// Print combined coverage as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Settings shared by `analyze` and `sweep`; flags override the config file.
#[derive(Args)]
struct AnalysisArgs {
    /// TOML analysis config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Uniform scale applied on load
    #[arg(long)]
    scale: Option<f64>,
    /// Sun direction as x,y,z
    #[arg(long, value_parser = parse_vec3, conflicts_with = "sun_azimuth")]
    sun: Option<[f64; 3]>,
    /// Sun azimuth in the XY plane (degrees)
    #[arg(long)]
    sun_azimuth: Option<f64>,
    /// Full horizontal field of view (degrees)
    #[arg(long)]
    fov_x: Option<f64>,
    /// Full vertical field of view (degrees)
    #[arg(long)]
    fov_y: Option<f64>,
    /// Largest accepted viewing angle (degrees)
    #[arg(long)]
    max_viewing_angle: Option<f64>,
    /// Largest accepted sun incidence angle (degrees)
    #[arg(long)]
    max_sun_angle: Option<f64>,
    /// Reflection cone angle (degrees)
    #[arg(long)]
    reflection_angle: Option<f64>,
    /// Sun-occlusion rule
    #[arg(long, value_enum)]
    occlusion: Option<Occlusion>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Occlusion {
    /// Shadowed by any surface toward the sun
    AnyBlocker,
    /// Shadowed only by surfaces right at the patch
    NearSurface,
}

impl From<Occlusion> for glint::SunOcclusionMode {
    fn from(o: Occlusion) -> Self {
        match o {
            Occlusion::AnyBlocker => Self::AnyBlocker,
            Occlusion::NearSurface => Self::NearSurface,
        }
    }
}

fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got '{s}'"));
    }
    let mut v = [0.0; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("bad component '{part}': {e}"))?;
    }
    Ok(v)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    match cli.command {
        Commands::Info { mesh, scale } => commands::info(&mesh, scale)?,
        Commands::Analyze {
            mesh,
            analysis,
            camera,
            target,
            out,
            ply,
            json,
        } => commands::analyze(
            &mesh,
            &analysis,
            commands::CameraOverrides { camera, target },
            out.as_deref(),
            ply.as_deref(),
            json,
        )?,
        Commands::Sweep {
            mesh,
            analysis,
            out,
            distance,
            start,
            step,
            count,
            elevation,
            json,
        } => commands::sweep(
            &mesh,
            &analysis,
            commands::OrbitOverrides {
                distance,
                start,
                step,
                count,
                elevation,
            },
            &out,
            json,
        )?,
    }

    Ok(())
}
