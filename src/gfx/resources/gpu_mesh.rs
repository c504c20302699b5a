//! GPU-resident meshes
//!
//! Every mesh is uploaded exactly once, at startup, into a single vertex
//! buffer: positions in bytes `[0, 16 * vertex_count)`, normals directly
//! after. The buffer lives until the owning [`GpuMesh`] is dropped.

use std::ops::Range;

use crate::gfx::{
    mesh::MeshData,
    rendering::vertex::{VertexLayout, FLOAT_SIZE},
};

/// Byte layout and draw counts for one uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshLayout {
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub position_bytes: wgpu::BufferAddress,
    pub normal_bytes: wgpu::BufferAddress,
}

impl MeshLayout {
    pub fn of(mesh: &MeshData) -> Self {
        Self {
            vertex_count: mesh.vertex_count() as u32,
            triangle_count: mesh.triangle_count() as u32,
            position_bytes: mesh.positions.len() as wgpu::BufferAddress * FLOAT_SIZE,
            normal_bytes: mesh.normals.len() as wgpu::BufferAddress * FLOAT_SIZE,
        }
    }

    pub fn total_bytes(&self) -> wgpu::BufferAddress {
        self.position_bytes + self.normal_bytes
    }

    /// Offset of the first normal; equals the size of the position range.
    pub fn normal_offset(&self) -> wgpu::BufferAddress {
        self.position_bytes
    }

    pub fn position_range(&self) -> Range<wgpu::BufferAddress> {
        0..self.position_bytes
    }

    pub fn normal_range(&self) -> Range<wgpu::BufferAddress> {
        self.normal_offset()..self.total_bytes()
    }

    /// Vertices submitted by a draw of this mesh.
    pub fn draw_vertex_count(&self) -> u32 {
        self.triangle_count * 3
    }
}

/// A mesh uploaded to the GPU.
pub struct GpuMesh {
    label: String,
    buffer: wgpu::Buffer,
    layout: MeshLayout,
    normals_bound: bool,
}

impl GpuMesh {
    /// Allocates one buffer, writes the position range then the normal range,
    /// and records whether the program binds normals.
    pub fn upload(device: &wgpu::Device, vertex_layout: &VertexLayout, mesh: &MeshData, label: &str) -> Self {
        let layout = MeshLayout::of(mesh);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: layout.total_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: true,
        });

        {
            let mut mapped = buffer.slice(..).get_mapped_range_mut();
            let split = layout.normal_offset() as usize;
            mapped[..split].copy_from_slice(bytemuck::cast_slice(&mesh.positions));
            mapped[split..].copy_from_slice(bytemuck::cast_slice(&mesh.normals));
        }
        buffer.unmap();

        log::info!(
            "Uploaded '{}': {} vertices, {} triangles, {} bytes (normals at {}{})",
            label,
            layout.vertex_count,
            layout.triangle_count,
            layout.total_bytes(),
            layout.normal_offset(),
            if vertex_layout.has_normals() { "" } else { ", unbound" }
        );

        Self {
            label: label.to_owned(),
            buffer,
            layout,
            normals_bound: vertex_layout.has_normals(),
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.layout.triangle_count
    }

    pub fn position_slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(self.layout.position_range())
    }

    pub fn normal_slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        self.normals_bound
            .then(|| self.buffer.slice(self.layout.normal_range()))
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        log::debug!("Releasing mesh buffer '{}'", self.label);
        self.buffer.destroy();
    }
}

/// Draw helpers for uploaded meshes
pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &GpuMesh, vertex_count: u32);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &GpuMesh, vertex_count: u32) {
        self.set_vertex_buffer(0, mesh.position_slice());
        if let Some(normals) = mesh.normal_slice() {
            self.set_vertex_buffer(1, normals);
        }
        self.draw(0..vertex_count, 0..1);
    }
}
