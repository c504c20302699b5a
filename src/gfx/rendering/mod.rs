// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles vertex layout resolution, render pipelines, per-frame draw planning
//! and frame submission.

pub mod frame_renderer;
pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use frame_renderer::{DrawCall, FramePacket, FrameRenderer};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use vertex::VertexLayout;
