use std::{sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::ViewerConfig,
    gfx::{rendering::render_engine::RenderEngine, scene::Scene},
    input::{InputEvent, InputHandler, InputOutcome, KeyState},
    simulation::{SimulationManager, SplineAnimator},
};

pub struct WaypathApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    simulation_manager: SimulationManager,
    input: InputHandler,
    last_frame: Option<Instant>,
    /// Set when the loop had to stop because of a failure
    error: Option<anyhow::Error>,
}

impl WaypathApp {
    /// Creates the event loop and attaches the spline animator to `scene`
    pub fn new(config: ViewerConfig, mut scene: Scene) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        config.apply_to_camera(&mut scene.camera_manager.camera);

        let mut simulation_manager = SimulationManager::new();
        simulation_manager.set_time_scale(config.animation.time_scale);
        simulation_manager.attach_simulation(Box::new(SplineAnimator::new()), &mut scene);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                simulation_manager,
                input: InputHandler::default(),
                last_frame: None,
                error: None,
            },
        })
    }

    /// Runs until the window closes or Escape is pressed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn grab_cursor(&self, grab: bool) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if grab {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(err) = grabbed {
                log::warn!("Could not grab the cursor: {err}");
            }
        } else if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("Could not release the cursor: {err}");
        }
        window.set_cursor_visible(!grab);
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        let outcome = self
            .input
            .handle(event, &mut self.scene, &mut self.simulation_manager);
        if outcome == InputOutcome::Quit {
            event_loop.exit();
        }
    }

    /// One frame: time step, camera, animation, upload, draw
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = self
            .last_frame
            .replace(now)
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        self.scene.update_camera(delta_time);
        self.simulation_manager.update(delta_time, &mut self.scene);
        render_engine.update(&mut self.scene);

        if let Err(err) = render_engine.render_frame(&self.scene) {
            self.fail(event_loop, anyhow::Error::new(err).context("rendering failed"));
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("failed to create window"));
                return;
            }
        };

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height));
        let mut renderer = match renderer {
            Ok(renderer) => renderer,
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("failed to start renderer"));
                return;
            }
        };

        renderer.set_clear_color(self.config.render.clear_color);
        renderer.init_scene(&mut self.scene);
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
        log::info!("{:?}", self.scene.get_statistics());

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.grab_cursor(true);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let state = match (state, repeat) {
                    (ElementState::Released, _) => KeyState::Released,
                    (ElementState::Pressed, false) => KeyState::Pressed,
                    (ElementState::Pressed, true) => KeyState::Repeated,
                };
                self.dispatch(event_loop, InputEvent::Key { code, state });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(
                    event_loop,
                    InputEvent::PointerMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    },
                );
            }
            WindowEvent::Focused(focused) => {
                self.dispatch(event_loop, InputEvent::FocusChanged(focused));
                self.grab_cursor(focused);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
