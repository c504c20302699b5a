//! WGPU-based rendering engine for the viewer
//!
//! Owns the surface, device, depth buffer, uniform bindings and the three
//! uploaded meshes. Each redraw acquires a surface image first and submits one
//! [`FramePacket`] into it.

use std::sync::Arc;
use wgpu::Device;

use crate::{
    error::{Result, ViewerError},
    gfx::{
        mesh::MeshData,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBOContent},
            gpu_mesh::{DrawMesh, GpuMesh},
            object_bindings::{object_bind_group_layout, ObjectBindings},
            texture_resource::TextureResource,
        },
        scene::{SceneObjectId, SceneState},
        shader::ShaderSource,
    },
    logging,
};

use super::{
    frame_renderer::FramePacket,
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const SCENE_PIPELINE: &str = "Scene";

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    device: Arc<Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    minimized: bool,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_bindings: [ObjectBindings; 3],
    meshes: [GpuMesh; 3],
}

impl RenderEngine {
    /// Creates the device and surface, compiles the program and uploads the
    /// meshes. `mesh_data` is indexed by [`SceneObjectId::index`].
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        program: &ShaderSource,
        mesh_data: &[MeshData; 3],
        scene: &SceneState,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| ViewerError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::Adapter(e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| ViewerError::Device(e.to_string()))?;
        logging::install_device_diagnostics(&device);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| ViewerError::Surface("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let object_layout = object_bind_group_layout(&device);
        let object_bindings = SceneObjectId::DRAW_ORDER
            .map(|id| ObjectBindings::new(&device, &object_layout, scene.object_matrices(id)));

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();

        let mut pipeline_manager = PipelineManager::new(device_handle.clone(), program)?;
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            &PipelineConfig::default()
                .with_label("Scene Pipeline")
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout,
                ]),
        )?;

        let labels = ["Animated Mesh", "Cylinder Mesh", "Cones Mesh"];
        let vertex_layout = pipeline_manager.vertex_layout();
        let meshes = [0, 1, 2].map(|i| GpuMesh::upload(&device_handle, vertex_layout, &mesh_data[i], labels[i]));

        Ok(RenderEngine {
            device: device_handle,
            queue: queue_handle,
            surface,
            config,
            minimized: false,
            depth_texture,
            pipeline_manager,
            global_bindings,
            object_bindings,
            meshes,
        })
    }

    /// Triangle counts of the uploaded meshes, indexed by [`SceneObjectId::index`].
    pub fn triangle_counts(&self) -> [u32; 3] {
        [0, 1, 2].map(|i| self.meshes[i].triangle_count())
    }

    /// Acquires the next surface image, or `None` when no frame can be drawn:
    /// the window is minimized, the surface was lost or outdated (it is
    /// reconfigured for the next attempt), or acquisition timed out.
    pub fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        if self.minimized {
            return Ok(None);
        }

        match self.surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                Ok(None)
            }
            Err(e) => Err(ViewerError::Surface(e.to_string())),
        }
    }

    /// Uploads the packet's uniforms and draws every object in packet order
    /// into an image returned by [`acquire`](Self::acquire).
    pub fn render_frame(&mut self, surface_texture: wgpu::SurfaceTexture, packet: &FramePacket) {
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.global_bindings.update(
            &self.queue,
            GlobalUBOContent::new(packet.view, packet.projection, &packet.lighting),
        );
        for draw in &packet.draws {
            self.object_bindings[draw.object.index()].update(&self.queue, draw.matrices);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for draw in &packet.draws {
                    let index = draw.object.index();
                    render_pass.set_bind_group(1, self.object_bindings[index].bind_group(), &[]);
                    render_pass.draw_mesh(&self.meshes[index], draw.vertex_count);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Follows the window size. A zero-sized window suspends drawing until
    /// the next non-zero resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.minimized = width == 0 || height == 0;
        if self.minimized {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        log::info!("Releasing GPU resources");
    }
}
