//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a bounds-checked view into a color buffer. There is no depth
//! buffer: triangles land in submission order and later fills win.

use super::target::RenderTarget;
use crate::colors;

/// A view into a color buffer.
///
/// Wraps a 1D slice with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily for the duration of a draw.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from a buffer slice and dimensions.
    ///
    /// A slice too short for `width * height` pixels keeps its full rows
    /// only: the view's height shrinks to what the slice holds.
    pub fn new(color_buffer: &'a mut [u32], width: u32, height: u32) -> Self {
        let rows = match width {
            0 => 0,
            w => color_buffer.len() / w as usize,
        };
        let height = if rows < height as usize {
            log::warn!(
                "color buffer of {} pixels is too small for {}x{}; using {} rows",
                color_buffer.len(),
                width,
                height,
                rows
            );
            rows as u32
        } else {
            height
        };
        Self {
            color_buffer,
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }
}

impl RenderTarget for FrameBuffer<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Writes one pixel through the alpha convention. Silently ignores
    /// out-of-bounds coordinates.
    #[inline]
    fn fill_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            let dst = self.color_buffer[idx];
            self.color_buffer[idx] = colors::blend(dst, color);
        }
    }

    /// Horizontal run, clipped once up front instead of per pixel.
    fn fill_span(&mut self, y: i32, x_start: i32, x_end: i32, color: u32) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let x_start = x_start.max(0);
        let x_end = x_end.min(self.width as i32 - 1);
        if x_start > x_end {
            return;
        }

        let row = y as usize * self.width as usize;
        let run = &mut self.color_buffer[row + x_start as usize..=row + x_end as usize];
        if color >> 24 == 0 {
            run.fill(color | 0xFF00_0000);
        } else {
            for px in run {
                *px = colors::blend(*px, color);
            }
        }
    }
}
