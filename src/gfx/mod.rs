//! # Graphics Module
//!
//! Everything between the OBJ files on disk and the pixels on screen.
//!
//! - **Meshes** ([`mesh`]) - OBJ loading into flat position/normal arrays
//! - **Shaders** ([`shader`]) - WGSL program loading and attribute reflection
//! - **Scene** ([`scene`]) - Camera, projection, rotation and animation state
//! - **Resources** ([`resources`]) - Mesh buffers, uniform buffers and bind groups
//! - **Rendering** ([`rendering`]) - Pipelines, frame planning and submission

pub mod mesh;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-export commonly used types
pub use rendering::render_engine::RenderEngine;
pub use scene::SceneState;
