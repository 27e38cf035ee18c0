//! Grass field demo
//!
//! Fly with W/A/S/D and Q/E over blades generated on the GPU each frame.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use tiny_asteroids::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use tiny_asteroids::grass::GrassField;
use tiny_asteroids::platform::KeyboardState;
use tiny_asteroids::renderer::GpuContext;

const TITLE: &str = "Grass Field";
const FIELD_SEED: u64 = 0x6772_6173_73;

struct Demo {
    window: Arc<Window>,
    gpu: GpuContext,
    field: GrassField,
    keys: KeyboardState,
    last_frame: Instant,
}

impl Demo {
    async fn new(window: Arc<Window>) -> Result<Self> {
        // 64 MiB of vertex storage fits the default 128 MiB binding limit
        let gpu = GpuContext::new(window.clone(), true, wgpu::Limits::default()).await?;
        let field = GrassField::new(&gpu, FIELD_SEED);

        Ok(Self {
            window,
            gpu,
            field,
            keys: KeyboardState::new(),
            last_frame: Instant::now(),
        })
    }

    /// Returns true when the app should exit
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                self.gpu.resize(size.width, size.height);
                self.field.resize(&self.gpu);
                false
            }
            WindowEvent::Focused(false) => {
                self.keys.clear();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keys.process_event(&event);
                false
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.field.update(&self.gpu, self.keys.fly_direction(), dt);

                let mut exit = false;
                match self.field.render(&self.gpu) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        self.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        exit = true;
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
                self.window.request_redraw();
                exit
            }
            _ => false,
        }
    }
}

#[derive(Default)]
struct App {
    demo: Option<Demo>,
    /// Startup failure, returned from `main` once the loop exits
    error: Option<anyhow::Error>,
}

impl App {
    /// Exit status once the event loop has returned
    fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.demo.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Demo::new(window.clone())) {
            Ok(demo) => {
                self.demo = Some(demo);
                window.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to initialize grass field: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(demo) = &mut self.demo {
            if demo.handle_window_event(event) {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting grass field");
    log::info!("Controls: W/S forward/back, A/D strafe, Q/E up/down");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    app.finish()
}
