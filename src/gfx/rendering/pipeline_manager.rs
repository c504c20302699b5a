//! Render pipeline management for wgpu
//!
//! Compiles a vertex/fragment program once and builds named pipelines from it.
//! Compilation and pipeline creation run inside a validation error scope, so
//! a program the driver rejects fails startup instead of surfacing later as a
//! diagnostic.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::{
    error::{Result, ViewerError},
    gfx::shader::ShaderSource as ProgramSource,
};

use super::vertex::VertexLayout;

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub polygon_mode: PolygonMode,
    pub depth_format: Option<TextureFormat>,
    pub color_format: TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            polygon_mode: PolygonMode::Fill,
            depth_format: None,
            color_format: TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    ///
    /// # Arguments
    /// * `layouts` - Bind group layouts in slot order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a buffer of the given format (builder pattern)
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }
}

/// Owns the compiled program and the pipelines built from it
pub struct PipelineManager {
    device: Arc<Device>,
    vertex_module: ShaderModule,
    fragment_module: ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
    vertex_layout: VertexLayout,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    /// Compiles both stages of `program` and resolves its vertex layout.
    pub fn new(device: Arc<Device>, program: &ProgramSource) -> Result<Self> {
        let vertex_layout = VertexLayout::resolve(program)?;

        let (vertex_module, fragment_module) = validated(&device, || {
            (
                create_module(&device, &program.vertex.path.to_string_lossy(), &program.vertex.source),
                create_module(&device, &program.fragment.path.to_string_lossy(), &program.fragment.source),
            )
        })
        .map_err(|message| ViewerError::ProgramLink {
            label: program.vertex.path.display().to_string(),
            message,
        })?;

        Ok(Self {
            device,
            vertex_module,
            fragment_module,
            vertex_entry: program.vertex.entry_point.clone(),
            fragment_entry: program.fragment.entry_point.clone(),
            vertex_layout,
            pipelines: HashMap::new(),
        })
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    /// Creates a pipeline and stores it under `name`
    pub fn register_pipeline(&mut self, name: &str, config: &PipelineConfig) -> Result<()> {
        let pipeline = validated(&self.device, || self.create_pipeline(config)).map_err(|message| {
            ViewerError::ProgramLink {
                label: name.to_string(),
                message,
            }
        })?;
        self.pipelines.insert(name.to_string(), pipeline);
        Ok(())
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    fn create_pipeline(&self, config: &PipelineConfig) -> RenderPipeline {
        let bind_group_layout_refs: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &bind_group_layout_refs,
            push_constant_ranges: &[],
        });

        let vertex_buffers = self.vertex_layout.buffer_layouts();
        let color_targets = [Some(ColorTargetState {
            format: config.color_format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &self.vertex_module,
                entry_point: Some(&self.vertex_entry),
                buffers: &vertex_buffers,
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &self.fragment_module,
                entry_point: Some(&self.fragment_entry),
                targets: &color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: config.polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

fn create_module(device: &Device, label: &str, source: &str) -> ShaderModule {
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

/// Runs `f` inside a validation error scope and returns its output, or the
/// driver's validation message.
fn validated<T>(device: &Device, f: impl FnOnce() -> T) -> std::result::Result<T, String> {
    device.push_error_scope(ErrorFilter::Validation);
    let output = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(error.to_string()),
        None => Ok(output),
    }
}
