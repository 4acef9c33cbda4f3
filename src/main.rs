use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::Window,
};

// Import from the library crate
use isocraft::{config::GameConfig, controller, logging, ui, view};

use controller::{InputProcessor, MouseButton, Session};
use view::{FramePainter, GpuContext, IsoRenderer};

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    painter: FramePainter,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    session: Session,
    renderer: IsoRenderer,
    input: InputProcessor,

    // Frame timing
    last_frame_time: Instant,
}

impl App {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let gpu = GpuContext::new_native(window.clone()).await?;
        let painter = FramePainter::new(&gpu);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let session = Session::new(config);
        info!(
            "world ready: {} blocks, seed {:?}, {} mode",
            session.world().len(),
            session.seed(),
            session.mode()
        );

        Ok(Self {
            window,
            gpu,
            painter,
            egui_state,
            egui_ctx,
            session,
            renderer: IsoRenderer::new(config.block_scale),
            input: InputProcessor::default(),
            last_frame_time: Instant::now(),
        })
    }

    /// Returns true if the event was handled here
    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        if self.egui_state.on_window_event(self.window.as_ref(), event).consumed {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent { state: ElementState::Pressed, logical_key, .. },
                ..
            } => {
                let intent = key_name(logical_key).and_then(|name| self.input.intent_for_key(&name));
                if let Some(intent) = intent {
                    self.session.apply(intent);
                }
                true
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return false,
                };
                if self.egui_ctx.is_pointer_over_area() {
                    return false;
                }
                if let Some(intent) = self.input.intent_for_click(button) {
                    self.session.apply(intent);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // positive means scrolled down, like the browser's deltaY
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                if let Some(intent) = self.input.intent_for_wheel(delta_y) {
                    self.session.apply(intent);
                }
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size.width, new_size.height);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame_time;
        self.last_frame_time = now;
        self.session.update(dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let (mut output, intents) = ui::build_ui(&self.egui_ctx, raw_input, &self.session, &mut self.renderer);
        for intent in intents {
            self.session.apply(intent);
        }

        let platform_output = std::mem::take(&mut output.platform_output);
        self.egui_state.handle_platform_output(&self.window, platform_output);

        let pixels_per_point = output.pixels_per_point;
        self.painter.paint(&self.gpu, &self.egui_ctx, output, pixels_per_point)
    }
}

/// Key names in the form the input processor expects ("w", " ", "ArrowUp")
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(s) => Some(s.to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp".to_string()),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown".to_string()),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft".to_string()),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight".to_string()),
        _ => None,
    }
}

fn main() -> Result<()> {
    logging::init();
    let config = GameConfig::from_env();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_attributes = Window::default_attributes()
        .with_title("isocraft")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop
        .create_window(window_attributes)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window, config)).context("failed to initialise the GPU")?;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                        WindowEvent::RedrawRequested => {
                            app.update();

                            match app.render() {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    error!("surface out of memory, exiting");
                                    elwt.exit();
                                }
                                Err(e) => warn!("frame dropped: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .context("event loop failed")?;

    Ok(())
}
