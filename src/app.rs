//! Native front-end: one winit window showing the quad.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::assets::load_image;
use crate::{DemoConfig, Renderer, TextureCycle};

/// Raised when no window can be opened, e.g. without a display server.
#[derive(Debug)]
pub struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Opens the window and blocks until it is closed.
pub fn run(config: DemoConfig) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    // Frames are drawn on demand only.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(config)?;
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.last_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ViewerApp {
    config: DemoConfig,
    cycle: TextureCycle,
    state: Option<WindowState>,
    last_error: Option<anyhow::Error>,
}

struct WindowState {
    window: Arc<Window>,
    renderer: Renderer,
}

impl ViewerApp {
    fn new(config: DemoConfig) -> Result<Self> {
        config.validate()?;
        let cycle = TextureCycle::new(config.textures.iter().cloned())?;
        Ok(Self {
            config,
            cycle,
            state: None,
            last_error: None,
        })
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Quad Viewer")
                        .with_inner_size(LogicalSize::new(800.0, 600.0)),
                )
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );
        let mut renderer = block_on(Renderer::for_window(Arc::clone(&window), &self.config))?;

        let name = self.cycle.current().to_string();
        let image = load_image(&self.config, &name)
            .with_context(|| format!("failed to load initial texture {name}"))?;
        renderer.set_texture(&image);
        info!("showing {name}");

        window.request_redraw();
        self.state = Some(WindowState { window, renderer });
        Ok(())
    }

    fn show_next_texture(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let name = self.cycle.advance().to_string();
        if !state.renderer.activate(&name) {
            match load_image(&self.config, &name) {
                Ok(image) => state.renderer.set_texture(&image),
                Err(err) => {
                    error!("failed to load texture {name}: {err}");
                    return;
                }
            }
        }
        info!("showing {name}");
        state.window.request_redraw();
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        if let Err(err) = state.renderer.render() {
            state.renderer.handle_surface_error(err)?;
            state.window.request_redraw();
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.last_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.renderer.resize(size.width, size.height);
                state.window.request_redraw();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.show_next_texture(),
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}
