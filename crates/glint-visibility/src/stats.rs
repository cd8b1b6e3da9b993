//! Per-configuration visibility statistics.

use serde::Serialize;

/// Counts and angles from one pipeline run.
///
/// Lighting counts are taken over the camera-unoccluded patches only, so they
/// never exceed `camera_unoccluded`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityStats {
    /// Patches passing the FOV / facing / viewing-angle cull.
    pub geometric_visible: usize,
    /// Geometric candidates with an unobstructed line of sight.
    pub camera_unoccluded: usize,
    /// Unoccluded patches facing the sun within the incidence bound.
    pub sun_illuminated: usize,
    /// Unoccluded patches meeting the specular condition.
    pub reflection_ok: usize,
    /// Lighting candidates with an unobstructed path to the sun.
    pub sun_unoccluded: usize,
    /// Patches in the final mask.
    pub final_visible: usize,
    /// Number of patches in the mesh.
    pub total_patches: usize,
    /// Summed area of the final-visible patches.
    pub visible_area: f64,
    /// Summed area of all patches.
    pub total_area: f64,
    /// Indices of final-visible patches, ascending.
    pub visible_indices: Vec<usize>,
    /// Incidence angle per visible patch (radians), aligned with `visible_indices`.
    pub incidence_angles: Vec<f64>,
    /// Viewing angle per visible patch (radians), aligned with `visible_indices`.
    pub viewing_angles: Vec<f64>,
}

impl VisibilityStats {
    /// All-zero stats for a mesh of the given size.
    pub fn empty(total_patches: usize, total_area: f64) -> Self {
        Self {
            geometric_visible: 0,
            camera_unoccluded: 0,
            sun_illuminated: 0,
            reflection_ok: 0,
            sun_unoccluded: 0,
            final_visible: 0,
            total_patches,
            visible_area: 0.0,
            total_area,
            visible_indices: Vec::new(),
            incidence_angles: Vec::new(),
            viewing_angles: Vec::new(),
        }
    }

    /// `part / whole * 100`, or zero for an empty whole.
    pub fn percent(part: f64, whole: f64) -> f64 {
        if whole > 0.0 {
            part / whole * 100.0
        } else {
            0.0
        }
    }

    /// Final-visible patches as a percentage of all patches.
    pub fn visible_percent(&self) -> f64 {
        Self::percent(self.final_visible as f64, self.total_patches as f64)
    }

    /// Visible area as a percentage of the total area.
    pub fn area_percent(&self) -> f64 {
        Self::percent(self.visible_area, self.total_area)
    }

    /// A stage count as a percentage of the geometric-visible count.
    pub fn percent_of_geometric(&self, count: usize) -> f64 {
        Self::percent(count as f64, self.geometric_visible as f64)
    }

    /// Rows of `(patch index, incidence deg, viewing deg)`.
    pub fn angle_rows(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.visible_indices
            .iter()
            .zip(&self.incidence_angles)
            .zip(&self.viewing_angles)
            .map(|((&i, inc), view)| (i, inc.to_degrees(), view.to_degrees()))
    }
}
