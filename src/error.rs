//! Error taxonomy for the viewer
//!
//! Resource-load failures are fatal and abort startup. Optional shader
//! attributes are not errors and surface as `None` from the shader lookup
//! instead.

use std::path::PathBuf;

/// Errors that can occur while loading resources or driving the GPU.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to load mesh '{path}': {source}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh '{path}' contains no vertices")]
    EmptyMesh { path: PathBuf },

    #[error("mesh '{path}' is malformed: {detail}")]
    MeshShape { path: PathBuf, detail: String },

    #[error("failed to read shader '{path}': {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse shader '{path}':\n{message}")]
    ShaderParse { path: PathBuf, message: String },

    #[error("shader '{path}' has no {stage} entry point")]
    MissingEntryPoint { path: PathBuf, stage: &'static str },

    #[error("shader program '{label}' was rejected by the device:\n{message}")]
    ProgramLink { label: String, message: String },

    #[error("shader program does not expose the required attribute '{name}'")]
    MissingAttribute { name: String },

    #[error("failed to request a GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to request a GPU device: {0}")]
    Device(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
