// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles mesh buffers, uniform buffers, bind groups and the depth buffer.

pub mod global_bindings;
pub mod gpu_mesh;
pub mod lighting;
pub mod object_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use gpu_mesh::{DrawMesh, GpuMesh, MeshLayout};
pub use lighting::LightingParameters;
pub use object_bindings::{ObjectBindings, ObjectUniform};
pub use texture_resource::TextureResource;
