//! Heliflight: an interactive helicopter flight demo.
//!
//! One helicopter, a ground plane, four spotlights and an orbit camera.
//! Fly with WASD/QE plus Shift/Space for the collective; drag the mouse
//! to orbit and scroll to zoom.

mod config;
mod events;
mod helicopter;
mod scene;

use anyhow::{Context, Result};
use engine_core::{Mat4, Time, Vec2, Vec3};
use helicopter::Helicopter;
use input::InputState;
use renderer::{load_parts, Model, OrbitCamera, Renderer};
use scene::SceneLights;
use std::path::Path;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

const HELICOPTER_ASSET: &str = "assets/helicopter.glb";
const GROUND_ASSET: &str = "assets/ground.glb";

/// Where the camera sits at startup, in world space.
const INITIAL_EYE: Vec3 = Vec3::new(10.0, 10.0, 10.0);

pub struct GameState {
    time: Time,
    input: InputState,

    renderer: Renderer,
    camera: OrbitCamera,
    /// When set, the orbit target tracks the helicopter each frame.
    camera_follow: bool,
    zoom_speed: f32,

    helicopter: Helicopter,
    ground: Model,
    lights: SceneLights,

    screenshot_requested: bool,
    pub running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: &config::GameConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;

        let helicopter = Helicopter::load(&renderer.device, Path::new(HELICOPTER_ASSET))
            .with_context(|| format!("loading helicopter from {HELICOPTER_ASSET}"))?;

        let ground = load_parts(Path::new(GROUND_ASSET))
            .with_context(|| format!("loading ground from {GROUND_ASSET}"))?
            .into_iter()
            .next()
            .context("ground model has no meshes")?
            .upload(&renderer.device);

        let spawn = helicopter.flight.position;
        let camera = OrbitCamera::new(
            renderer.size.width as f32,
            renderer.size.height as f32,
            INITIAL_EYE,
            spawn,
        );

        Ok(Self {
            time: Time::new(),
            input: InputState::new(),
            renderer,
            camera,
            camera_follow: true,
            zoom_speed: config.zoom_speed,
            helicopter,
            ground,
            lights: SceneLights::new(),
            screenshot_requested: false,
            running: true,
        })
    }

    fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        self.helicopter.update(self.input.controls(), dt);

        if self.camera_follow {
            self.camera.follow(self.helicopter.flight.position);
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            self.camera.orbit(Vec2::ZERO, scroll * self.zoom_speed);
        }

        self.lights.update_strobe(self.time.elapsed_seconds());

        self.input.begin_frame();
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.update_camera(&self.camera);
        self.renderer.update_lights(&self.lights.uniform());

        let (output, mut encoder) = self.renderer.begin_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let sky = self.lights.sky_color();
        let helicopter = &self.helicopter;
        let ground = &self.ground;
        self.renderer.with_scene_pass(
            &mut encoder,
            &view,
            self.renderer.depth_view(),
            sky,
            |renderer, pass| {
                draw_scene(renderer, pass, ground, helicopter);
            },
        );

        self.renderer.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if self.screenshot_requested {
            self.screenshot_requested = false;
            let path = format!("screenshot-{:06}.png", self.time.frame_count());
            let result = self.renderer.screenshot(Path::new(&path), sky, |renderer, pass| {
                draw_scene(renderer, pass, ground, helicopter);
            });
            // a failed screenshot is not worth killing the flight over
            if let Err(e) = result {
                log::error!("Screenshot failed: {e:#}");
            }
        }

        Ok(())
    }

    /// Free GPU resources on the way out.
    fn shutdown(&mut self) {
        self.helicopter.release();
        self.ground.mesh.destroy();
    }
}

/// Record every draw of one frame: the ground, then each helicopter part
/// with its composed world matrix. The instance offset runs across all
/// draws so their buffer writes stay disjoint.
fn draw_scene(
    renderer: &Renderer,
    pass: &mut wgpu::RenderPass,
    ground: &Model,
    helicopter: &Helicopter,
) {
    let mut offset = 0;
    offset += renderer.draw_model(pass, ground, Mat4::IDENTITY, offset);
    for (part, model) in helicopter.parts() {
        let matrix = helicopter.flight.model_matrix(part);
        offset += renderer.draw_model(pass, model, matrix, offset);
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = config::GameConfig::load();
            let mut window_attrs = Window::default_attributes()
                .with_title("Heliflight")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));
            if config.fullscreen {
                window_attrs =
                    window_attrs.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let state = pollster::block_on(GameState::new(window.clone(), &config));
            match state {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {e:#}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                state.shutdown();
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                        Heliflight                         ║");
    println!("╠═══════════════════════════════════════════════════════════╣");
    println!("║  FLIGHT:                                                  ║");
    println!("║    W/S    - Pitch down / up   │  A/D   - Roll left/right  ║");
    println!("║    Q/E    - Yaw left / right  │  Shift - Throttle up      ║");
    println!("║    Space  - Throttle down     │                           ║");
    println!("║  CAMERA:                                                  ║");
    println!("║    Drag   - Orbit             │  Scroll - Zoom            ║");
    println!("║    0      - Look at origin    │  1      - Free orbit      ║");
    println!("║    2      - Follow helicopter │                           ║");
    println!("║  SCENE:                                                   ║");
    println!("║    M      - Day / night       │  N      - Floodlights     ║");
    println!("║    P      - Screenshot        │  Escape - Quit            ║");
    println!("╚═══════════════════════════════════════════════════════════╝");

    log::info!("Starting Heliflight");

    let event_loop = EventLoop::new()?;
    // Poll continuously so flight input and redraw never wait on the OS
    // event queue.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
