//! ASCII PLY export with per-face colors.
//!
//! Writes the mesh vertices unchanged and one `face` element per triangle
//! carrying `red`/`green`/`blue` properties, so viewers such as MeshLab or
//! CloudCompare show the visibility mask directly on the surface.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glint_mesh::SurfaceMesh;
use glint_visibility::VisibilityMask;

use crate::{GlintError, Result};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color of visible faces.
pub const RED: Rgb = Rgb(255, 0, 0);
/// Color of all other faces.
pub const GRAY: Rgb = Rgb(128, 128, 128);

/// A mesh paired with a face mask, ready to write.
#[derive(Debug)]
pub struct PlyExport<'a> {
    mesh: &'a SurfaceMesh,
    mask: &'a VisibilityMask,
    visible: Rgb,
    hidden: Rgb,
}

impl<'a> PlyExport<'a> {
    /// Pair `mesh` with `mask`; the mask needs one entry per face.
    pub fn new(mesh: &'a SurfaceMesh, mask: &'a VisibilityMask) -> Result<Self> {
        if mask.len() != mesh.num_faces() {
            return Err(GlintError::MaskLength {
                expected: mesh.num_faces(),
                actual: mask.len(),
            });
        }
        Ok(Self {
            mesh,
            mask,
            visible: RED,
            hidden: GRAY,
        })
    }

    /// Override the two face colors.
    pub fn with_colors(mut self, visible: Rgb, hidden: Rgb) -> Self {
        self.visible = visible;
        self.hidden = hidden;
        self
    }

    /// Export to a PLY file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.export_to_writer(&mut writer)?;
        writer.flush()
    }

    /// Export to a writer.
    pub fn export_to_writer(&self, mut writer: impl Write) -> std::io::Result<()> {
        self.write_header(&mut writer)?;

        for v in self.mesh.vertices() {
            writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
        }

        for (face, &visible) in self.mesh.faces().iter().zip(self.mask.iter()) {
            let Rgb(r, g, b) = if visible { self.visible } else { self.hidden };
            writeln!(writer, "3 {} {} {} {r} {g} {b}", face[0], face[1], face[2])?;
        }

        Ok(())
    }

    fn write_header(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "comment visible faces {}", self.mask.count())?;
        writeln!(writer, "element vertex {}", self.mesh.num_vertices())?;
        writeln!(writer, "property double x")?;
        writeln!(writer, "property double y")?;
        writeln!(writer, "property double z")?;
        writeln!(writer, "element face {}", self.mesh.num_faces())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
        writeln!(writer, "end_header")?;
        Ok(())
    }
}
