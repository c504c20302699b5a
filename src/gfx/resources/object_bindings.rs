//! Per-object model and normal matrices (slot 1)
//!
//! Each object owns its own buffer: queue writes land before the render pass
//! executes, so a single shared buffer would leave every draw with the last
//! object's matrices.

use crate::{
    gfx::scene::ObjectMatrices,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// MUST match the `Transforms` struct in the vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl From<ObjectMatrices> for ObjectUniform {
    fn from(matrices: ObjectMatrices) -> Self {
        Self {
            model: matrices.model.into(),
            normal_matrix: matrices.normal.into(),
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    binding_types::single_uniform_layout(device, "Object Bind Group Layout", wgpu::ShaderStages::VERTEX)
}

pub struct ObjectBindings {
    ubo: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, initial: ObjectMatrices) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &ObjectUniform::from(initial));
        let bind_group =
            binding_types::single_uniform_bind_group(device, "Object Bind Group", layout, ubo.binding_resource());
        Self { ubo, bind_group }
    }

    /// Uploads new matrices. Unchanged matrices (static objects) are not rewritten.
    pub fn update(&mut self, queue: &wgpu::Queue, matrices: ObjectMatrices) {
        self.ubo.update_content(queue, matrices.into());
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
