use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use sdl2::keyboard::Keycode;

use rastline::colors;
use rastline::prelude::*;
use rastline::window::{FrameLimiter, Window, WindowEvent, DEFAULT_FPS};

/// rastline - software triangle rasterizer demo
#[derive(Parser, Debug)]
#[command(name = "rastline", version, about = "Spinning-mesh demo for the rastline software rasterizer")]
struct Args {
    /// Wavefront OBJ model to draw instead of the built-in cube
    #[arg(short, long)]
    model: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f64,

    #[arg(long, default_value_t = 0.1)]
    near: f64,

    #[arg(long, default_value_t = 100.0)]
    far: f64,

    /// Distance from the camera to the model
    #[arg(long, default_value_t = 5.0)]
    distance: f64,

    /// orthographic | weak-perspective | perspective
    #[arg(long, default_value = "perspective")]
    projection: ProjectionMode,

    /// none | back | front
    #[arg(long, default_value = "back")]
    cull: CullFaceMode,

    /// solid | wireframe | mixed
    #[arg(long, default_value = "mixed")]
    render: RenderMode,

    /// none | flat
    #[arg(long, default_value = "flat")]
    shading: ShadingMode,

    /// scanline | edge-function
    #[arg(long, default_value = "scanline")]
    rasterizer: RasterizerType,

    /// top-left | inclusive
    #[arg(long, default_value = "top-left")]
    fill: FillConvention,

    /// Target frame rate
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Render one frame to this PNG and exit without opening a window
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            projection: Projection::new(
                self.fov,
                self.width as f64 / self.height.max(1) as f64,
                self.near,
                self.far,
            ),
            projection_mode: self.projection,
            cull_face: self.cull,
            render_mode: self.render,
            shading_mode: self.shading,
            rasterizer: self.rasterizer,
            fill_convention: self.fill,
        }
    }
}

/// Per-run demo state: the scene, the projection parameters the keys edit,
/// and the stop flag.
struct Demo {
    engine: Engine,
    renderer: Renderer,
    mesh: Mesh,
    projection: Projection,
    model: Transform,
    paused: bool,
    running: bool,
}

impl Demo {
    fn new(args: &Args) -> Result<Self, EngineError> {
        let config = args.config();
        let mesh = match &args.model {
            Some(path) => Mesh::from_obj(path)?,
            None => Mesh::cube(1.0),
        };
        info!("{} face(s) loaded", mesh.face_count());
        Ok(Self {
            engine: Engine::with_config(config),
            renderer: Renderer::new(config.width, config.height),
            mesh,
            projection: config.projection,
            model: Transform::at(Vec3::new(0.0, 0.0, args.distance)),
            paused: false,
            running: true,
        })
    }

    fn update(&mut self, delta_ms: u64) {
        if !self.paused {
            let step = delta_ms as f64 * 0.05;
            self.model.rotate(Vec3::new(step * 0.5, step, 0.0));
        }
    }

    fn render(&mut self) {
        self.renderer.clear(colors::BACKGROUND);
        self.renderer.draw_grid(50, colors::GRID);

        let engine = &mut self.engine;
        engine.push_matrix();
        engine.mult_matrix(&self.model.to_matrix());
        engine.draw_mesh(&self.mesh);
        engine.pop_matrix();
        engine.commence_draw(&mut self.renderer.as_framebuffer());

        if let Some(err) = engine.take_error() {
            log::debug!("frame degraded: {}: {}", err.code(), err);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.engine.set_viewport(width, height);
        self.projection.set_aspect_ratio(width as f64 / height.max(1) as f64);
        self.apply_projection(self.engine.projection_mode());
    }

    fn apply_projection(&mut self, mode: ProjectionMode) {
        let projection = self.projection;
        self.engine.set_projection(mode, &projection);
    }

    fn handle_key(&mut self, key: Keycode) {
        let engine = &mut self.engine;
        match key {
            Keycode::Num1 => engine.set_render_mode(RenderMode::Solid),
            Keycode::Num2 => engine.set_render_mode(RenderMode::Wireframe),
            Keycode::Num3 => engine.set_render_mode(RenderMode::Mixed),
            Keycode::F => engine.set_shading_mode(match engine.shading_mode() {
                ShadingMode::Flat => ShadingMode::None,
                ShadingMode::None => ShadingMode::Flat,
            }),
            Keycode::C => engine.set_cull_face(match engine.cull_face() {
                CullFaceMode::Back => CullFaceMode::Front,
                CullFaceMode::Front => CullFaceMode::None,
                CullFaceMode::None => CullFaceMode::Back,
            }),
            Keycode::R => engine.set_rasterizer(match engine.rasterizer() {
                RasterizerType::Scanline => RasterizerType::EdgeFunction,
                RasterizerType::EdgeFunction => RasterizerType::Scanline,
            }),
            Keycode::T => engine.set_fill_convention(match engine.fill_convention() {
                FillConvention::TopLeft => FillConvention::Inclusive,
                FillConvention::Inclusive => FillConvention::TopLeft,
            }),
            Keycode::P => {
                let next = match engine.projection_mode() {
                    ProjectionMode::Perspective => ProjectionMode::WeakPerspective,
                    ProjectionMode::WeakPerspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
                self.apply_projection(next);
            }
            Keycode::Up | Keycode::Down => {
                let step = if key == Keycode::Up { 5.0 } else { -5.0 };
                let fov = (self.projection.fov() + step).clamp(10.0, 170.0);
                self.projection.set_fov(fov);
                self.apply_projection(self.engine.projection_mode());
            }
            Keycode::Space => self.paused = !self.paused,
            Keycode::S => {
                let path = "rastline.png";
                match self.renderer.save_png(path) {
                    Ok(()) => info!("saved {}", path),
                    Err(e) => log::warn!("could not save {}: {}", path, e),
                }
            }
            _ => {}
        }
    }

    fn title(&self) -> String {
        let e = &self.engine;
        format!(
            "rastline | {} | {} shading | cull {} | {} | {} {}",
            e.render_mode(),
            e.shading_mode(),
            e.cull_face(),
            e.projection_mode(),
            e.rasterizer(),
            e.fill_convention()
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let mut demo = Demo::new(&args)?;

    if let Some(path) = &args.output {
        demo.render();
        demo.renderer.save_png(path)?;
        let stats = demo.engine.stats();
        info!(
            "wrote {}: {} drawn, {} culled in {:?}",
            path.display(),
            stats.drawn,
            stats.culled,
            stats.draw_time
        );
        return Ok(());
    }

    let mut window = Window::new("rastline", args.width, args.height)?;
    window.set_title(&demo.title());
    let mut limiter = FrameLimiter::new(&window, args.fps);
    let mut frame: u64 = 0;

    while demo.running {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => demo.running = false,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h)?;
                    demo.resize(w, h);
                }
                WindowEvent::Key(key) => {
                    demo.handle_key(key);
                    window.set_title(&demo.title());
                }
            }
        }

        let delta = limiter.wait_and_get_delta(&window);
        demo.update(delta);
        demo.render();
        window.present(demo.renderer.as_bytes())?;

        frame += 1;
        if args.frames.is_some_and(|n| frame >= n) {
            demo.running = false;
        }
    }

    let stats = demo.engine.stats();
    info!(
        "{} frame(s); last frame {} drawn, {} culled",
        frame, stats.drawn, stats.culled
    );
    Ok(())
}
