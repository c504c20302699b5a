// src/lib.rs
//! Motion Viewer
//!
//! Renders three OBJ meshes with wgpu and winit, one of them animated along a
//! figure-eight path, driven entirely from the keyboard.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::ViewerError;

/// Loads every resource named by `config` and runs the viewer until it exits.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    ViewerApp::new(config)?.run()
}
