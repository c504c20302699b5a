use anyhow::Context;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    error::ViewerError,
    gfx::{
        mesh::{load_obj, MeshData},
        rendering::{FrameRenderer, RenderEngine},
        scene::SceneState,
        shader::ShaderSource,
    },
    input::SceneCommand,
};

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Everything the event loop touches. Key events and redraws are delivered on
/// the same thread, so commands and frames never interleave.
struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    frame_renderer: Option<FrameRenderer>,
    scene: SceneState,
    meshes: [MeshData; 3],
    program: ShaderSource,
    failure: Option<anyhow::Error>,
}

impl ViewerApp {
    /// Loads the meshes and the shader program. Any missing or malformed
    /// resource aborts here, before a window is opened.
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let [animated, cylinder, cones] = config.mesh_paths();
        let meshes = [
            load_obj(&animated).with_context(|| format!("loading animated mesh {}", animated.display()))?,
            load_obj(&cylinder).with_context(|| format!("loading cylinder mesh {}", cylinder.display()))?,
            load_obj(&cones).with_context(|| format!("loading cones mesh {}", cones.display()))?,
        ];

        let program = ShaderSource::load(&config.shader_root, &config.vertex_shader, &config.fragment_shader)
            .context("loading shader program")?;

        let event_loop = EventLoop::new()
            .map_err(|e| ViewerError::EventLoop(e.to_string()))
            .context("creating event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                frame_renderer: None,
                scene: SceneState::new(),
                meshes,
                program,
                failure: None,
            },
        })
    }

    /// Runs the event loop until the window closes or a terminate command
    /// arrives. GPU resources are released when the app state drops.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| ViewerError::EventLoop(e.to_string()))?;

        match self.app_state.failure.take() {
            Some(error) => Err(error),
            None => {
                log::info!("Viewer closed");
                Ok(())
            }
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure = Some(error);
        event_loop.exit();
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, command: SceneCommand) {
        self.scene.apply(command);
        if self.scene.exit_requested() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("creating window"));
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(
            window,
            width,
            height,
            &self.program,
            &self.meshes,
            &self.scene,
        ));

        match renderer {
            Ok(renderer) => {
                self.frame_renderer = Some(FrameRenderer::new(renderer.triangle_counts()));
                self.render_engine = Some(renderer);
            }
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("initializing renderer")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = SceneCommand::from_key_event(&event) {
                    self.apply(event_loop, command);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let (Some(render_engine), Some(frame_renderer)) =
                    (self.render_engine.as_mut(), self.frame_renderer.as_ref())
                else {
                    return;
                };

                let target = match render_engine.acquire() {
                    Ok(target) => target,
                    Err(e) => {
                        self.fail(event_loop, anyhow::Error::new(e).context("acquiring frame"));
                        return;
                    }
                };
                if let Some((surface_texture, packet)) = frame_renderer.render(&mut self.scene, target) {
                    render_engine.render_frame(surface_texture, &packet);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let minimized = self
            .render_engine
            .as_ref()
            .is_some_and(RenderEngine::is_minimized);
        if let (Some(window), false) = (self.window.as_ref(), minimized) {
            window.request_redraw();
        }
    }
}
