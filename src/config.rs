//! Startup configuration
//!
//! These values are fixed for the lifetime of a session. The builder methods
//! exist so the binary (and tests) can point the viewer at a different asset
//! directory without touching the defaults.

use std::path::{Path, PathBuf};

/// Window, asset and shader settings used while building the viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in physical pixels.
    pub width: u32,
    /// Initial window height in physical pixels.
    pub height: u32,
    /// Directory the mesh paths below are resolved against.
    pub asset_root: PathBuf,
    /// Mesh animated along the motion path.
    pub animated_mesh: PathBuf,
    /// Static mesh drawn at x = -2.
    pub cylinder_mesh: PathBuf,
    /// Static mesh drawn at x = +2.
    pub cones_mesh: PathBuf,
    /// Directory holding the shader pair.
    pub shader_root: PathBuf,
    /// Base name of the vertex shader (`<name>.vert.wgsl`).
    pub vertex_shader: String,
    /// Base name of the fragment shader (`<name>.frag.wgsl`).
    pub fragment_shader: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Moving Objects".to_string(),
            width: 600,
            height: 600,
            asset_root: PathBuf::from("."),
            animated_mesh: PathBuf::from("obj/cow.obj"),
            cylinder_mesh: PathBuf::from("obj/cylinder.obj"),
            cones_mesh: PathBuf::from("obj/coneProject2.obj"),
            shader_root: PathBuf::from("shaders"),
            vertex_shader: "passthrough".to_string(),
            fragment_shader: "directional".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Mesh paths in draw order: animated object, cylinder, cones.
    pub fn mesh_paths(&self) -> [PathBuf; 3] {
        [
            self.resolve(&self.animated_mesh),
            self.resolve(&self.cylinder_mesh),
            self.resolve(&self.cones_mesh),
        ]
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }
}
