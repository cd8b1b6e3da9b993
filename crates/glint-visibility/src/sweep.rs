//! Multi-configuration sweep and coverage aggregation.

use std::sync::atomic::{AtomicBool, Ordering};

use glint_mesh::SurfaceMesh;
use glint_raytrace::RayCaster;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{CameraConfig, SunConfig};
use crate::error::{Result, VisibilityError};
use crate::mask::VisibilityMask;
use crate::pipeline::VisibilityPipeline;
use crate::stats::VisibilityStats;

/// Running union of per-configuration masks.
///
/// Accumulators over disjoint subsets of a sweep can be combined with
/// [`CoverageAccumulator::merge`] in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageAccumulator {
    union: VisibilityMask,
    configurations: usize,
}

impl CoverageAccumulator {
    /// Empty accumulator for `num_patches` patches.
    pub fn new(num_patches: usize) -> Self {
        Self {
            union: VisibilityMask::none(num_patches),
            configurations: 0,
        }
    }

    /// OR one configuration's mask into the union.
    pub fn add(&mut self, mask: &VisibilityMask) -> Result<()> {
        if mask.len() != self.union.len() {
            return Err(VisibilityError::MaskLength {
                expected: self.union.len(),
                actual: mask.len(),
            });
        }
        self.union.union_with(mask);
        self.configurations += 1;
        Ok(())
    }

    /// Combine two partial accumulators.
    pub fn merge(mut self, other: Self) -> Self {
        self.union.union_with(&other.union);
        self.configurations += other.configurations;
        self
    }

    pub fn union(&self) -> &VisibilityMask {
        &self.union
    }

    /// Number of configurations added so far.
    pub fn configurations(&self) -> usize {
        self.configurations
    }

    /// Coverage fractions for the union against `mesh`.
    pub fn finalize(&self, mesh: &SurfaceMesh) -> CombinedCoverage {
        let total_patches = self.union.len();
        let visible_patches = self.union.count();
        let total_area = mesh.total_area();
        let visible_area = mesh.masked_area(&self.union);
        CombinedCoverage {
            mask: self.union.clone(),
            visible_patches,
            total_patches,
            count_fraction: fraction(visible_patches as f64, total_patches as f64),
            visible_area,
            total_area,
            area_fraction: fraction(visible_area, total_area),
            configurations: self.configurations,
        }
    }
}

fn fraction(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Union over a sweep and the coverage it reaches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedCoverage {
    /// Patches visible in at least one configuration.
    pub mask: VisibilityMask,
    pub visible_patches: usize,
    pub total_patches: usize,
    /// `visible_patches / total_patches`, in `[0, 1]`.
    pub count_fraction: f64,
    pub visible_area: f64,
    pub total_area: f64,
    /// `visible_area / total_area`, in `[0, 1]`.
    pub area_fraction: f64,
    /// Number of configurations that contributed.
    pub configurations: usize,
}

/// Output of one configuration within a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationRun {
    /// Position of the configuration in the input sequence.
    pub index: usize,
    pub camera: CameraConfig,
    pub mask: VisibilityMask,
    pub stats: VisibilityStats,
}

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    /// Completed runs in input order.
    pub runs: Vec<ConfigurationRun>,
    pub coverage: CombinedCoverage,
    /// True if cancellation skipped at least one configuration.
    pub cancelled: bool,
}

/// Run `pipeline` once per camera and union the results.
pub fn run_sweep<C: RayCaster + ?Sized>(
    pipeline: &VisibilityPipeline<'_, C>,
    cameras: &[CameraConfig],
    sun: &SunConfig,
) -> Result<SweepOutcome> {
    sweep_with_cancel(pipeline, cameras, sun, &AtomicBool::new(false))
}

/// Like [`run_sweep`], checking `cancel` before each configuration.
///
/// Configurations not yet started when `cancel` is raised are skipped; the
/// coverage then reflects only the completed runs.
#[instrument(skip_all, fields(configurations = cameras.len()))]
pub fn sweep_with_cancel<C: RayCaster + ?Sized>(
    pipeline: &VisibilityPipeline<'_, C>,
    cameras: &[CameraConfig],
    sun: &SunConfig,
    cancel: &AtomicBool,
) -> Result<SweepOutcome> {
    let n = pipeline.num_patches();

    let results: Vec<Option<Result<ConfigurationRun>>> = cameras
        .par_iter()
        .enumerate()
        .map(|(index, camera)| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            Some(pipeline.run(camera, sun).map(|out| ConfigurationRun {
                index,
                camera: camera.clone(),
                mask: out.mask,
                stats: out.stats,
            }))
        })
        .collect();
    let runs = results.into_iter().flatten().collect::<Result<Vec<_>>>()?;

    let accumulator = runs
        .par_iter()
        .try_fold(
            || CoverageAccumulator::new(n),
            |mut acc, run| {
                acc.add(&run.mask)?;
                Ok::<_, VisibilityError>(acc)
            },
        )
        .try_reduce(|| CoverageAccumulator::new(n), |a, b| Ok(a.merge(b)))?;

    let coverage = accumulator.finalize(pipeline.mesh());
    let cancelled = runs.len() < cameras.len();
    info!(
        completed = runs.len(),
        cancelled,
        visible = coverage.visible_patches,
        total = coverage.total_patches,
        area_fraction = coverage.area_fraction,
        "sweep finished"
    );

    Ok(SweepOutcome {
        runs,
        coverage,
        cancelled,
    })
}
