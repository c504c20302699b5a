//! # Mesh Data
//!
//! Flat, non-indexed triangle lists ready for upload. Positions are stored in
//! groups of four floats (`w = 1`), normals in groups of three, one normal per
//! position.

use std::path::Path;

use cgmath::{InnerSpace, Vector3};

use crate::error::{Result, ViewerError};

pub const POSITION_COMPONENTS: usize = 4;
pub const NORMAL_COMPONENTS: usize = 3;

/// Parsed vertex positions and normals for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshData {
    /// Builds a mesh from flat sequences, checking that they describe whole
    /// triangles with one normal per vertex.
    pub fn new(positions: Vec<f32>, normals: Vec<f32>) -> Result<Self> {
        let mesh = Self { positions, normals };
        mesh.validate(Path::new("<memory>"))?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.positions.is_empty() {
            return Err(ViewerError::EmptyMesh {
                path: path.to_path_buf(),
            });
        }

        let shape_error = |detail: String| ViewerError::MeshShape {
            path: path.to_path_buf(),
            detail,
        };

        if self.positions.len() % POSITION_COMPONENTS != 0 {
            return Err(shape_error(format!(
                "{} position floats is not a multiple of {}",
                self.positions.len(),
                POSITION_COMPONENTS
            )));
        }
        if self.normals.len() % NORMAL_COMPONENTS != 0 {
            return Err(shape_error(format!(
                "{} normal floats is not a multiple of {}",
                self.normals.len(),
                NORMAL_COMPONENTS
            )));
        }

        let normal_count = self.normals.len() / NORMAL_COMPONENTS;
        if normal_count != self.vertex_count() {
            return Err(shape_error(format!(
                "{} positions but {} normals",
                self.vertex_count(),
                normal_count
            )));
        }
        if self.vertex_count() % 3 != 0 {
            return Err(shape_error(format!(
                "{} vertices do not form whole triangles",
                self.vertex_count()
            )));
        }

        Ok(())
    }
}

/// Loads an OBJ file and flattens every model in it into one triangle list.
///
/// Faces are triangulated and the index buffer is expanded, so the result can
/// be drawn with a non-indexed draw call. Models without normals get flat
/// per-face normals.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| ViewerError::MeshLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let has_normals = mesh.normals.len() == mesh.positions.len();

        for triangle in mesh.indices.chunks_exact(3) {
            let corners = [
                vertex_at(&mesh.positions, triangle[0]),
                vertex_at(&mesh.positions, triangle[1]),
                vertex_at(&mesh.positions, triangle[2]),
            ];
            let face_normal = face_normal(corners);

            for (corner, &index) in corners.iter().zip(triangle) {
                positions.extend_from_slice(&[corner.x, corner.y, corner.z, 1.0]);
                let normal = if has_normals {
                    vertex_at(&mesh.normals, index)
                } else {
                    face_normal
                };
                normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
            }
        }
    }

    let mesh = MeshData { positions, normals };
    mesh.validate(path)?;

    log::info!(
        "Loaded '{}': vertex floats = {}, normal floats = {}, triangles = {}",
        path.display(),
        mesh.positions.len(),
        mesh.normals.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

fn vertex_at(data: &[f32], index: u32) -> Vector3<f32> {
    let i = index as usize * 3;
    Vector3::new(data[i], data[i + 1], data[i + 2])
}

fn face_normal([a, b, c]: [Vector3<f32>; 3]) -> Vector3<f32> {
    let normal = (b - a).cross(c - a);
    if normal.magnitude2() > 0.0 {
        normal.normalize()
    } else {
        normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("motionview_{}_{}.obj", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_counts_from_flat_data() {
        let mesh = MeshData::new(vec![0.0; 12 * 4], vec![0.0; 12 * 3]).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let result = MeshData::new(Vec::new(), Vec::new());
        assert!(matches!(result, Err(ViewerError::EmptyMesh { .. })));
    }

    #[test]
    fn test_rejects_mismatched_normals() {
        let result = MeshData::new(vec![0.0; 3 * 4], vec![0.0; 2 * 3]);
        assert!(matches!(result, Err(ViewerError::MeshShape { .. })));
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let result = MeshData::new(vec![0.0; 4 * 4], vec![0.0; 4 * 3]);
        assert!(matches!(result, Err(ViewerError::MeshShape { .. })));
    }

    #[test]
    fn test_load_quad_expands_indices() {
        let path = write_temp_obj(
            "quad",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n",
        );
        let mesh = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.positions.chunks(4).all(|p| p[3] == 1.0));
        assert!(mesh.normals.chunks(3).all(|n| n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_load_derives_face_normals() {
        let path = write_temp_obj("triangle", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(&mesh.normals[0..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load_obj("definitely/not/here.obj");
        assert!(matches!(result, Err(ViewerError::MeshLoad { .. })));
    }
}
