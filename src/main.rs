use std::{path::Path, sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use joystick_nav::{controller::InputEvent, logging, model::TouchpadSkin, view::GpuContext, DemoApp, DemoConfig};

/// Pointer id used for the mouse, out of the range winit hands out for touches
const MOUSE_POINTER: u64 = u64::MAX;

struct Running {
    window: Arc<Window>,
    app: DemoApp,
    egui_state: egui_winit::State,
}

struct App {
    config: DemoConfig,
    running: Option<Running>,
    cursor: (f32, f32),
    last_frame: Instant,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            running: None,
            cursor: (0.0, 0.0),
            last_frame: Instant::now(),
            startup_error: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running> {
        let window_attributes = Window::default_attributes()
            .with_title("Joystick Nav")
            .with_inner_size(PhysicalSize::new(800, 600));
        let window = Arc::new(event_loop.create_window(window_attributes).context("failed to create window")?);
        let size = window.inner_size();

        let gpu = pollster::block_on(GpuContext::new_native(window.clone(), size.width, size.height))
            .context("GPU initialization failed")?;
        let skin = TouchpadSkin::load(Path::new(self.config.asset_root)).context("failed to load touchpad skin")?;

        let app = DemoApp::init(gpu, &self.config, &skin);
        let egui_state = egui_winit::State::new(
            app.egui_ctx().clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        Ok(Running { window, app, egui_state })
    }
}

fn touch_event(touch: &Touch) -> InputEvent {
    let (id, x, y) = (touch.id, touch.location.x as f32, touch.location.y as f32);
    match touch.phase {
        TouchPhase::Started => InputEvent::PointerDown { id, x, y },
        TouchPhase::Moved => InputEvent::PointerMove { id, x, y },
        TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp { id, x, y },
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                self.last_frame = Instant::now();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("startup failed: {:#}", e);
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let egui_consumed = running.egui_state.on_window_event(&running.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => {
                if let Some(running) = self.running.take() {
                    running.app.shutdown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                running.app.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                let raw_input = running.egui_state.take_egui_input(&running.window);
                match running.app.tick(dt, raw_input) {
                    Ok(platform_output) => {
                        running.egui_state.handle_platform_output(&running.window, platform_output);
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        running.app.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => tracing::warn!("frame dropped: {:?}", e),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = (x, y);
                running.app.handle_event(&InputEvent::PointerMove { id: MOUSE_POINTER, x, y });
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let (x, y) = self.cursor;
                match state {
                    ElementState::Pressed if !egui_consumed => {
                        running.app.handle_event(&InputEvent::PointerDown { id: MOUSE_POINTER, x, y });
                    }
                    ElementState::Pressed => {}
                    ElementState::Released => {
                        running.app.handle_event(&InputEvent::PointerUp { id: MOUSE_POINTER, x, y });
                    }
                }
            }
            WindowEvent::Touch(touch) => {
                running.app.handle_event(&touch_event(&touch));
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::F3),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
                ..
            } => {
                running.app.toggle_debug();
            }
            WindowEvent::Focused(false) => {
                running.app.handle_event(&InputEvent::FocusLost);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(DemoConfig::default());
    event_loop.run_app(&mut app).context("event loop terminated with an error")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
