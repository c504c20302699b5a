//! # Scene Module
//!
//! CPU-side state of the viewer: the three scene objects, the motion
//! parameter, the persistent rotation and the active camera and projection.
//! Nothing in here touches the GPU, so the whole module is testable headless.
//!
//! ## Key Components
//!
//! - [`SceneState`] - Everything a key command can change
//! - [`SceneObject`] - One drawable object and how it is placed
//! - [`AnimationState`] - Motion parameter `t` and continuous/stepped mode
//! - [`transform`] - Model, view, projection and normal matrix construction

pub mod animation;
pub mod scene;
pub mod transform;

// Re-export main types
pub use animation::{AnimationMode, AnimationState};
pub use scene::{ObjectMatrices, SceneObject, SceneObjectId, SceneState};
pub use transform::{CameraPreset, ProjectionPreset};
