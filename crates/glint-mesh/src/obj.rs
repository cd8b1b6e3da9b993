//! Wavefront OBJ import.
//!
//! Reads `v` and `f` records; everything else (normals, texture coordinates,
//! groups, materials) is ignored. Polygon faces are fan-triangulated, so the
//! resulting [`SurfaceMesh`] only ever contains triangles.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glint_math::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::SurfaceMesh;

/// Load an OBJ file and scale every vertex by `scale`.
pub fn load_obj(path: impl AsRef<Path>, scale: f64) -> Result<SurfaceMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = parse_obj(BufReader::new(file), scale)?;
    debug!(
        path = %path.display(),
        faces = mesh.num_faces(),
        vertices = mesh.num_vertices(),
        "loaded OBJ mesh"
    );
    Ok(mesh)
}

/// Parse OBJ text from a reader and scale every vertex by `scale`.
pub fn parse_obj<R: BufRead>(reader: R, scale: f64) -> Result<SurfaceMesh> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(MeshError::InvalidScale(scale));
    }

    let mut vertices: Vec<Point3> = Vec::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();
    let mut polygons = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f64; 3];
                for c in coords.iter_mut() {
                    let tok = tokens.next().ok_or_else(|| MeshError::Parse {
                        line: line_no,
                        message: "vertex needs three coordinates".into(),
                    })?;
                    *c = tok.parse::<f64>().map_err(|e| MeshError::Parse {
                        line: line_no,
                        message: format!("bad coordinate '{tok}': {e}"),
                    })?;
                }
                vertices.push(Point3::new(
                    coords[0] * scale,
                    coords[1] * scale,
                    coords[2] * scale,
                ));
            }
            Some("f") => {
                let corners = tokens
                    .map(|tok| resolve_index(tok, vertices.len(), line_no))
                    .collect::<Result<Vec<u32>>>()?;
                if corners.len() < 3 {
                    return Err(MeshError::Parse {
                        line: line_no,
                        message: format!("face has {} vertices, need at least 3", corners.len()),
                    });
                }
                if corners.len() > 3 {
                    polygons += 1;
                }
                // Fan around the first corner
                for k in 1..corners.len() - 1 {
                    faces.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    if polygons > 0 {
        debug!(polygons, "fan-triangulated polygon faces");
    }

    SurfaceMesh::new(vertices, faces)
}

/// Turn one face token (`7`, `7/2`, `7//3`, `-1`) into a 0-based vertex index.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head.parse().map_err(|e| MeshError::Parse {
        line,
        message: format!("bad face index '{token}': {e}"),
    })?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertex_count as i64 + r),
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as u32),
        _ => Err(MeshError::Parse {
            line,
            message: format!("face index {raw} out of range ({vertex_count} vertices so far)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn test_parse_quad_fan() {
        let mesh = parse_obj(QUAD.as_bytes(), 1.0).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
        assert_eq!(mesh.faces()[1], [0, 2, 3]);
        assert_relative_eq!(mesh.total_area(), 1.0);
    }

    #[test]
    fn test_parse_scale() {
        let mesh = parse_obj(QUAD.as_bytes(), 0.1).unwrap();
        assert_relative_eq!(mesh.vertices()[2], Point3::new(0.1, 0.1, 0.0));
        assert_relative_eq!(mesh.total_area(), 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_negative_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3/1 -2/2 -1/3\n";
        let mesh = parse_obj(src.as_bytes(), 1.0).unwrap();
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_index() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let err = parse_obj(src.as_bytes(), 1.0).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_short_face() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert!(matches!(
            parse_obj(src.as_bytes(), 1.0),
            Err(MeshError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_bad_coordinate() {
        let src = "v 0 zero 0\n";
        assert!(matches!(
            parse_obj(src.as_bytes(), 1.0),
            Err(MeshError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_no_faces() {
        let src = "v 0 0 0\n";
        assert!(matches!(
            parse_obj(src.as_bytes(), 1.0),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_invalid_scale() {
        assert!(matches!(
            parse_obj(QUAD.as_bytes(), -1.0),
            Err(MeshError::InvalidScale(_))
        ));
    }
}
