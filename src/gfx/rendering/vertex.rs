//! # Vertex Layout
//!
//! Meshes are stored non-interleaved: all positions first, then all normals,
//! in one buffer. The GPU sees that as two vertex buffer slots bound to
//! different ranges of the same buffer.
//!
//! - Slot 0: position, `Float32x4`, offset 0
//! - Slot 1: normal, `Float32x3`, offset = byte size of the position range,
//!   present only when the shader program exposes a normal attribute

use crate::{
    error::{Result, ViewerError},
    gfx::{
        mesh::{NORMAL_COMPONENTS, POSITION_COMPONENTS},
        shader::{ShaderSource, NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE},
    },
};

pub const FLOAT_SIZE: wgpu::BufferAddress = std::mem::size_of::<f32>() as wgpu::BufferAddress;
pub const POSITION_STRIDE: wgpu::BufferAddress = POSITION_COMPONENTS as wgpu::BufferAddress * FLOAT_SIZE;
pub const NORMAL_STRIDE: wgpu::BufferAddress = NORMAL_COMPONENTS as wgpu::BufferAddress * FLOAT_SIZE;

/// Attribute bindings resolved against a shader program.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    position: [wgpu::VertexAttribute; 1],
    normal: Option<[wgpu::VertexAttribute; 1]>,
}

impl VertexLayout {
    /// Resolves attribute locations. A missing position attribute is fatal; a
    /// missing normal attribute just leaves the normal slot unbound.
    pub fn resolve(program: &ShaderSource) -> Result<Self> {
        let position_location = program
            .attribute_location(POSITION_ATTRIBUTE)
            .ok_or_else(|| ViewerError::MissingAttribute {
                name: POSITION_ATTRIBUTE.to_string(),
            })?;

        let normal = program.attribute_location(NORMAL_ATTRIBUTE).map(|location| {
            [wgpu::VertexAttribute {
                offset: 0,
                shader_location: location,
                format: wgpu::VertexFormat::Float32x3,
            }]
        });
        if normal.is_none() {
            log::info!("Shader program has no '{}' attribute, normals stay unbound", NORMAL_ATTRIBUTE);
        }

        Ok(Self {
            position: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: position_location,
                format: wgpu::VertexFormat::Float32x4,
            }],
            normal,
        })
    }

    pub fn has_normals(&self) -> bool {
        self.normal.is_some()
    }

    /// Vertex buffer layouts for pipeline creation, in slot order.
    pub fn buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        let mut layouts = vec![wgpu::VertexBufferLayout {
            array_stride: POSITION_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.position,
        }];
        if let Some(normal) = &self.normal {
            layouts.push(wgpu::VertexBufferLayout {
                array_stride: NORMAL_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: normal,
            });
        }
        layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

    fn program(vertex: &str) -> ShaderSource {
        ShaderSource::from_wgsl("v.vert.wgsl", vertex.to_string(), "f.frag.wgsl", FRAGMENT.to_string())
            .unwrap()
    }

    #[test]
    fn test_layout_with_normals() {
        let layout = VertexLayout::resolve(&program(
            "@vertex fn vs_main(@location(0) position: vec4<f32>, @location(1) normal: vec3<f32>) -> @builtin(position) vec4<f32> { return position; }",
        ))
        .unwrap();

        let buffers = layout.buffer_layouts();
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers[0].attributes[0].shader_location, 0);
        assert_eq!(buffers[1].attributes[0].shader_location, 1);
        assert_eq!(buffers[0].array_stride, 16);
        assert_eq!(buffers[1].array_stride, 12);
    }

    #[test]
    fn test_layout_without_normals() {
        let layout = VertexLayout::resolve(&program(
            "@vertex fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> { return position; }",
        ))
        .unwrap();

        assert!(!layout.has_normals());
        assert_eq!(layout.buffer_layouts().len(), 1);
    }

    #[test]
    fn test_missing_position_is_fatal() {
        let result = VertexLayout::resolve(&program(
            "@vertex fn vs_main(@location(0) normal: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(normal, 1.0); }",
        ));
        assert!(matches!(result, Err(ViewerError::MissingAttribute { .. })));
    }
}
