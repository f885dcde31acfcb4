use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use dungeon_light::config::Config;
use dungeon_light::error::ConfigError;
use dungeon_light::game::{Game, Input};
use dungeon_light::logging::init_tracing;
use dungeon_light::player::MoveIntent;
use dungeon_light::renderer::{RenderContext, render_frame};
use dungeon_light::scaler::{ScaleLut, blit_bilinear_stretch};
use dungeon_light::tiles::CELL_SIZE;
use dungeon_light::world::World;

const DEFAULT_CONFIG: &str = "dungeon_light.toml";
const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

type Surface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<Surface>,
    game: Game,
    render: RenderContext,

    // Internal framebuffer at the game's logical resolution
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,
    scale_lut: ScaleLut,

    // Input and simulation
    keys_down: HashSet<KeyCode>,
    toggle_rays: bool,
    last_tick: Instant,
    lag: Duration,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        let fb_w = config.window.width as usize;
        let fb_h = config.window.height as usize;
        let game = Game::new(World::new(), &config);
        let render = RenderContext::new(fb_w, fb_h, CELL_SIZE as usize, config.light.clone());

        Self {
            config,
            window: None,
            surface: None,
            game,
            render,

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,
            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            toggle_rays: false,
            last_tick: Instant::now(),
            lag: Duration::ZERO,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fatal: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn input(&mut self) -> Input {
        let down = |k: KeyCode| self.keys_down.contains(&k);
        Input {
            movement: MoveIntent {
                left: down(KeyCode::KeyA),
                right: down(KeyCode::KeyD),
                up: down(KeyCode::KeyW),
                down: down(KeyCode::KeyS),
            },
            toggle_rays: std::mem::take(&mut self.toggle_rays),
        }
    }

    /// Runs the fixed 60 Hz simulation to catch up with real time.
    fn tick(&mut self) {
        let now = Instant::now();
        // Cap so a paused app doesn't replay seconds of input
        self.lag += now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;

        while self.lag >= TICK {
            let input = self.input();
            self.game.update(&input);
            self.lag -= TICK;
        }
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("resize surface: {e}"))?;

        let (dw, dh) = (dw.get() as usize, dh.get() as usize);
        if !self.scale_lut.matches(dw, dh, self.fb_w, self.fb_h) {
            self.scale_lut = ScaleLut::new(dw, dh, self.fb_w, self.fb_h);
        }

        render_frame(&mut self.fb, self.fb_w, self.fb_h, &self.game, &mut self.render);

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("surface buffer: {e}"))?;
        blit_bilinear_stretch(&mut buf, &self.fb, &self.scale_lut);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if code == KeyCode::KeyR && !repeat {
                        self.toggle_rays = true;
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// The config file named on the command line, else `dungeon_light.toml` if
/// it exists, else defaults. A file that fails to load is reported after
/// logging comes up.
fn load_config() -> (Config, Option<ConfigError>) {
    let arg = std::env::args().nth(1);
    let path = arg.as_deref().unwrap_or(DEFAULT_CONFIG);
    if arg.is_none() && !Path::new(path).exists() {
        return (Config::default(), None);
    }
    match Config::load(path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}

fn main() -> anyhow::Result<()> {
    let (config, load_error) = load_config();
    init_tracing(&config.log_filter);
    if let Some(err) = load_error {
        warn!("{err}; using defaults");
    }
    info!(
        width = config.window.width,
        height = config.window.height,
        view_radius = config.light.view_radius,
        "starting"
    );

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
