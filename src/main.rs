//! Tiny Asteroids entry point
//!
//! Opens the window, then runs the fixed-step simulation and renders one
//! frame per redraw.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use tiny_asteroids::Settings;
use tiny_asteroids::consts::SIM_DT;
use tiny_asteroids::platform::KeyboardState;
use tiny_asteroids::renderer::{GpuContext, Overlay, RenderState, build_frame, colors};
use tiny_asteroids::sim::{FpsCounter, FrameClock, World, tick};

/// Everything that exists once the window and device are up
struct Game {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,
    keys: KeyboardState,
    clock: FrameClock,
    fps: FpsCounter,
    world: World,
    show_fps: bool,
    show_position: bool,
    started: Instant,
    last_frame: Instant,
}

impl Game {
    async fn new(window: Arc<Window>, settings: &Settings) -> Result<Self> {
        let gpu = GpuContext::new(window.clone(), settings.vsync, wgpu::Limits::default()).await?;
        let render_state = RenderState::new(&gpu, colors::BACKGROUND);

        let seed = settings.seed.unwrap_or_else(seed_from_time);
        log::info!("World seed: {}", seed);

        let now = Instant::now();
        Ok(Self {
            window,
            gpu,
            render_state,
            keys: KeyboardState::new(),
            clock: FrameClock::new(SIM_DT, settings.max_steps_per_frame),
            fps: FpsCounter::default(),
            world: World::with_tuning(seed, settings.tuning.clone()),
            show_fps: settings.show_fps,
            show_position: settings.show_position,
            started: now,
            last_frame: now,
        })
    }

    /// Drop time queued while the window was resized or unfocused
    fn restart_timing(&mut self) {
        self.clock.reset();
        self.last_frame = Instant::now();
    }

    /// Play-field extent in pixels, read every step so resizes apply at once
    fn extent(&self) -> Vec2 {
        Vec2::new(self.gpu.size.0 as f32, self.gpu.size.1 as f32)
    }

    fn update(&mut self) {
        let now = Instant::now();
        let frame_dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let input = self.keys.tick_input();
        let extent = self.extent();
        let world = &mut self.world;
        self.clock.advance(frame_dt, |dt| tick(world, &input, extent, dt));

        self.fps.record(now.duration_since(self.started).as_secs_f64());
    }

    /// Returns false when the device can no longer render
    fn render(&mut self) -> bool {
        let overlay = Overlay {
            fps: self.show_fps.then(|| self.fps.fps()),
            show_position: self.show_position,
        };
        let vertices = build_frame(&self.world, self.gpu.size, &overlay);

        match self.render_state.render(&self.gpu, &vertices) {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                false
            }
            Err(e) => {
                log::warn!("Render error: {:?}", e);
                true
            }
        }
    }

    /// Returns true when the app should exit
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                self.gpu.resize(size.width, size.height);
                self.restart_timing();
                false
            }
            WindowEvent::Focused(false) => {
                self.keys.clear();
                self.restart_timing();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keys.process_event(&event);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                let alive = self.render();
                self.window.request_redraw();
                !alive
            }
            _ => false,
        }
    }
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

struct App {
    settings: Settings,
    game: Option<Game>,
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
        if self.game.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.settings.window.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.settings.window.width,
                self.settings.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Game::new(window.clone(), &self.settings)) {
            Ok(game) => {
                self.game = Some(game);
                window.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to initialize game: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(game) = &mut self.game {
            if game.handle_window_event(event) {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Tiny Asteroids");
    log::info!("Controls: A/D turn, W/S thrust, Space fire");

    let settings = Settings::load();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        settings,
        game: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    app.finish()
}
