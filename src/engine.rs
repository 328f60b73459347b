//! Core rendering engine.
//!
//! The [`Engine`] is the drawing context: it owns the matrix stacks, the
//! draw state (cull/render/shading modes, rasterizer), the draw queue and the
//! sticky error register. One frame is
//!
//! ```ignore
//! engine.push_matrix();
//! engine.translate(0.0, 0.0, 5.0);
//! engine.draw_mesh(&mesh);      // enqueue every face
//! engine.pop_matrix();
//! engine.commence_draw(&mut renderer.as_framebuffer());
//! ```
//!
//! Nothing here fails hard. Stack misuse, degenerate projections and
//! divide-by-zero land in the error register and the frame keeps going.

use std::time::{Duration, Instant};

use crate::colors;
use crate::error::{EngineError, ErrorRegister};
use crate::math::Matrix;
use crate::matrix_stack::{MatrixMode, MatrixStack};
use crate::mesh::Mesh;
use crate::pipeline::{self, CullFaceMode, DrawQueue, FrameStats};
use crate::projection::{Projection, ProjectionMode};
use crate::render::{
    FillConvention, Rasterizer, RasterizerDispatcher, RasterizerType, RenderTarget,
    SimpleTriangle,
};
use crate::triangle::{RenderMode, ShadingMode, Triangle};

/// Everything needed to set up an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Viewport size in pixels.
    pub width: u32,
    pub height: u32,
    pub projection: Projection,
    pub projection_mode: ProjectionMode,
    pub cull_face: CullFaceMode,
    pub render_mode: RenderMode,
    pub shading_mode: ShadingMode,
    pub rasterizer: RasterizerType,
    pub fill_convention: FillConvention,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            projection: Projection::new(60.0, 800.0 / 600.0, 0.1, 100.0),
            projection_mode: ProjectionMode::Perspective,
            cull_face: CullFaceMode::default(),
            render_mode: RenderMode::default(),
            shading_mode: ShadingMode::default(),
            rasterizer: RasterizerType::default(),
            fill_convention: FillConvention::default(),
        }
    }
}

pub struct Engine {
    width: u32,
    height: u32,
    stack: MatrixStack,
    cull_face: CullFaceMode,
    render_mode: RenderMode,
    shading_mode: ShadingMode,
    rasterizer: RasterizerDispatcher,
    queue: DrawQueue,
    errors: ErrorRegister,
    pending: FrameStats,
    stats: FrameStats,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        let config = EngineConfig {
            width,
            height,
            projection: Projection::new(60.0, width as f64 / height.max(1) as f64, 0.1, 100.0),
            ..EngineConfig::default()
        };
        Self::with_config(config)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self {
            width: config.width,
            height: config.height,
            stack: MatrixStack::new(),
            cull_face: config.cull_face,
            render_mode: config.render_mode,
            shading_mode: config.shading_mode,
            rasterizer: RasterizerDispatcher::new(config.rasterizer, config.fill_convention),
            queue: DrawQueue::new(),
            errors: ErrorRegister::new(),
            pending: FrameStats::default(),
            stats: FrameStats::default(),
        };
        engine.set_projection(config.projection_mode, &config.projection);
        log::debug!("engine created: {:?}", config);
        engine
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Changes the viewport mapping. The projection is left alone.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    // ============ Draw state ============

    pub fn set_cull_face(&mut self, mode: CullFaceMode) {
        log::debug!("cull face -> {}", mode);
        self.cull_face = mode;
    }

    pub fn cull_face(&self) -> CullFaceMode {
        self.cull_face
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        log::debug!("render mode -> {}", mode);
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        log::debug!("shading mode -> {}", mode);
        self.shading_mode = mode;
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading_mode
    }

    pub fn set_rasterizer(&mut self, rasterizer_type: RasterizerType) {
        log::debug!("rasterizer -> {}", rasterizer_type);
        self.rasterizer.set_type(rasterizer_type);
    }

    pub fn rasterizer(&self) -> RasterizerType {
        self.rasterizer.active_type()
    }

    pub fn set_fill_convention(&mut self, convention: FillConvention) {
        log::debug!("fill convention -> {}", convention);
        self.rasterizer.set_convention(convention);
    }

    pub fn fill_convention(&self) -> FillConvention {
        self.rasterizer.convention()
    }

    // ============ Matrix stack ============

    pub fn matrix_stack(&self) -> &MatrixStack {
        &self.stack
    }

    pub fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.stack.set_matrix_mode(mode);
    }

    /// Mode selection by name; an unknown name records `InvalidMode` and
    /// keeps the current mode.
    pub fn set_matrix_mode_named(&mut self, name: &str) {
        if let Some(mode) = self.errors.check(name.parse::<MatrixMode>()) {
            self.stack.set_matrix_mode(mode);
        }
    }

    pub fn push_matrix(&mut self) {
        self.errors.check(self.stack.push_matrix());
    }

    pub fn pop_matrix(&mut self) {
        self.errors.check(self.stack.pop_matrix());
    }

    pub fn load_identity(&mut self) {
        self.stack.load_identity();
    }

    pub fn load_matrix(&mut self, matrix: Matrix) {
        self.errors.check(self.stack.load_matrix(matrix));
    }

    pub fn mult_matrix(&mut self, matrix: &Matrix) {
        self.errors.check(self.stack.mult_matrix(matrix));
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.stack.translate(x, y, z);
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.stack.scale(x, y, z);
    }

    /// Degrees.
    pub fn rotate_x(&mut self, degrees: f64) {
        self.stack.rotate_x(degrees);
    }

    pub fn rotate_y(&mut self, degrees: f64) {
        self.stack.rotate_y(degrees);
    }

    pub fn rotate_z(&mut self, degrees: f64) {
        self.stack.rotate_z(degrees);
    }

    pub fn set_projection(&mut self, mode: ProjectionMode, params: &Projection) {
        self.stack.set_projection(mode, params).recover(&mut self.errors);
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.stack.projection_mode()
    }

    // ============ Errors ============

    pub fn last_error(&self) -> Option<&EngineError> {
        self.errors.last()
    }

    /// Returns the last error and clears the register.
    pub fn take_error(&mut self) -> Option<EngineError> {
        self.errors.take()
    }

    /// Text for the current register contents, `"NO_ERROR"` when clear.
    pub fn error_string(&self) -> String {
        self.errors.describe()
    }

    // ============ Pipeline ============

    /// Runs one model-space triangle through the pipeline and queues it.
    ///
    /// Returns `false` when the cull stage dropped it. Numeric failures along
    /// the way are recorded and the degraded triangle is still queued.
    pub fn enqueue(&mut self, triangle: &Triangle) -> bool {
        self.pending.submitted += 1;

        let mut t = *triangle;
        t.cull = false;
        t.render_mode = self.render_mode;
        t.shading_mode = self.shading_mode;

        pipeline::transform(&mut t, self.stack.model_view(), &mut self.errors);

        let view = pipeline::view_vector(&t, self.stack.projection_mode(), &mut self.errors);
        let normal = pipeline::face_normal(&t, &mut self.errors);
        pipeline::shade(&mut t, view, normal);

        if pipeline::should_cull(view, normal, self.cull_face) {
            t.cull = true;
            self.pending.culled += 1;
            return false;
        }

        pipeline::project(&mut t, self.stack.projection(), &mut self.errors);
        pipeline::to_viewport(&mut t, self.width, self.height);
        self.queue.push(t);
        true
    }

    /// Enqueues every face of `mesh`. Returns how many survived culling.
    pub fn draw_mesh(&mut self, mesh: &Mesh) -> usize {
        mesh.triangles().filter(|t| self.enqueue(t)).count()
    }

    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    /// Drains the draw queue into `target` in submission order.
    ///
    /// There is no depth test: a triangle queued later always paints over
    /// one queued earlier. Returns the time spent draining.
    pub fn commence_draw(&mut self, target: &mut dyn RenderTarget) -> Duration {
        let start = Instant::now();
        let mut drawn = 0;

        while let Some(t) = self.queue.pop() {
            let simple = t.to_simple();
            let color = t.fill_color();
            match t.render_mode {
                RenderMode::Solid => self.rasterizer.fill_triangle(&simple, target, color),
                RenderMode::Wireframe => Self::draw_edges(&simple, target, color),
                RenderMode::Mixed => {
                    self.rasterizer.fill_triangle(&simple, target, color);
                    Self::draw_edges(&simple, target, colors::OUTLINE);
                }
            }
            drawn += 1;
        }

        let elapsed = start.elapsed();
        self.stats = FrameStats {
            drawn,
            draw_time: elapsed,
            ..self.pending
        };
        self.pending = FrameStats::default();
        log::trace!(
            "frame: {} submitted, {} culled, {} drawn in {:?}",
            self.stats.submitted,
            self.stats.culled,
            drawn,
            elapsed
        );
        elapsed
    }

    /// Counters for the last [`Self::commence_draw`].
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn draw_edges(triangle: &SimpleTriangle, target: &mut dyn RenderTarget, color: u32) {
        let Some(snapped) = triangle.snapped() else {
            return;
        };
        let [a, b, c] = snapped.pixels();
        target.draw_line(a, b, color);
        target.draw_line(b, c, color);
        target.draw_line(c, a, color);
    }
}
