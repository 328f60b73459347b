//! A CPU-based software 3D rasterizer.
//!
//! Model-space triangles go through a fixed pipeline (model-view, flat
//! shading, face culling, projection, viewport) into a FIFO draw queue,
//! which is drained into any [`render::RenderTarget`] by a scanline or
//! edge-function rasterizer. SDL2 is only used by the demo binary for
//! window management and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use rastline::prelude::*;
//!
//! let mut engine = Engine::new(800, 600);
//! let mut renderer = Renderer::new(800, 600);
//! engine.translate(0.0, 0.0, 5.0);
//! engine.draw_mesh(&Mesh::cube(1.0));
//! engine.commence_draw(&mut renderer.as_framebuffer());
//! renderer.save_png("cube.png")?;
//! ```

pub mod colors;
pub mod engine;
pub mod error;
pub mod math;
pub mod matrix_stack;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod transform;
pub mod triangle;
pub mod window;

pub use engine::{Engine, EngineConfig};
pub use error::{Checked, EngineError, ErrorRegister};
pub use mesh::Mesh;
pub use projection::{Projection, ProjectionMode};
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rastline::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{Engine, EngineConfig};
    pub use crate::error::EngineError;
    pub use crate::pipeline::CullFaceMode;
    pub use crate::triangle::{RenderMode, ShadingMode, Triangle, Vertex};

    // Matrix stack & projection
    pub use crate::matrix_stack::{MatrixMode, MatrixStack};
    pub use crate::projection::{Projection, ProjectionMode};

    // Models
    pub use crate::mesh::Mesh;
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{Matrix, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::render::{FillConvention, RasterizerType, RenderTarget, Renderer};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        EdgeFunctionRasterizer, FillConvention, FrameBuffer, Rasterizer, ScanlineRasterizer,
        SimpleTriangle,
    };
}
