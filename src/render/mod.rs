//! Device-space drawing: render targets, the line generator and the
//! triangle rasterizers.

mod framebuffer;
mod line;
mod rasterizer;
mod renderer;
mod target;

pub use framebuffer::FrameBuffer;
pub use line::BresenhamLine;
pub use rasterizer::{
    EdgeFunctionRasterizer, FillConvention, Rasterizer, RasterizerDispatcher, RasterizerType,
    ScanlineRasterizer, SimpleTriangle, TriangleShape, Winding, GUARD_BAND,
};
pub use renderer::Renderer;
pub use target::{PixelRecorder, RenderTarget};
