//! Per-frame draw planning
//!
//! Turns the current [`SceneState`] into a [`FramePacket`]: the shared
//! view/projection/lighting values plus one draw per object. The render
//! engine uploads and submits the packet; nothing in here touches the GPU.

use cgmath::Matrix4;

use crate::gfx::{
    resources::LightingParameters,
    scene::{ObjectMatrices, SceneObjectId, SceneState},
};

/// One object draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub object: SceneObjectId,
    pub matrices: ObjectMatrices,
    pub vertex_count: u32,
}

/// Everything the GPU needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePacket {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub lighting: LightingParameters,
    pub draws: Vec<DrawCall>,
}

#[derive(Debug, Clone)]
pub struct FrameRenderer {
    triangle_counts: [u32; 3],
    lighting: LightingParameters,
}

impl FrameRenderer {
    /// `triangle_counts` is indexed by [`SceneObjectId::index`].
    pub fn new(triangle_counts: [u32; 3]) -> Self {
        Self {
            triangle_counts,
            lighting: LightingParameters::default(),
        }
    }

    /// Plans a frame for `target`, the acquired surface image. Without a target
    /// nothing is drawn, so the animation is left alone and `None` comes back.
    pub fn render<T>(&self, state: &mut SceneState, target: Option<T>) -> Option<(T, FramePacket)> {
        let target = target?;
        Some((target, self.plan(state)))
    }

    /// Advances the animation (continuous mode only), then plans the draws in
    /// fixed order. The animated object always sees the already-advanced `t`.
    fn plan(&self, state: &mut SceneState) -> FramePacket {
        state.animation.advance_for_frame();

        let draws = SceneObjectId::DRAW_ORDER
            .iter()
            .map(|&object| DrawCall {
                object,
                matrices: state.object_matrices(object),
                vertex_count: self.triangle_counts[object.index()] * 3,
            })
            .collect();

        FramePacket {
            view: state.view,
            projection: state.projection,
            lighting: self.lighting,
            draws,
        }
    }
}
