//! Global uniform bindings for camera and lighting data
//!
//! View, projection and lighting are shared by every draw in a frame and live
//! in one uniform buffer bound to group 0.

use cgmath::Matrix4;

use crate::{
    gfx::{resources::lighting::LightingParameters, scene::transform::OPENGL_TO_WGPU_MATRIX},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content.
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    ambient_light: [f32; 3],
    shininess: f32,
    light_direction: [f32; 3],
    strength: f32,
    light_color: [f32; 3],
    _padding0: f32,
    half_vector: [f32; 3],
    _padding1: f32,
}
// Total: 64 + 64 + 4 * 16 = 192 bytes

impl GlobalUBOContent {
    /// Packs the frame's matrices and lighting. `projection` is in OpenGL clip
    /// convention and gets its depth range remapped for wgpu here.
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, lighting: &LightingParameters) -> Self {
        Self {
            view: view.into(),
            projection: (OPENGL_TO_WGPU_MATRIX * projection).into(),
            ambient_light: lighting.ambient_light,
            shininess: lighting.shininess,
            light_direction: lighting.light_direction,
            strength: lighting.strength,
            light_color: lighting.light_color,
            _padding0: 0.0,
            half_vector: lighting.half_vector,
            _padding1: 0.0,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Bind group layout and bind group for the global uniforms (slot 0).
pub struct GlobalBindings {
    pub ubo: GlobalUBO,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUBO::new(device);
        let bind_group_layout = binding_types::single_uniform_layout(
            device,
            "Globals Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let bind_group = binding_types::single_uniform_bind_group(
            device,
            "Globals Bind Group",
            &bind_group_layout,
            ubo.binding_resource(),
        );

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUBOContent) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
