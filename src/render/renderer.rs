//! Owning color buffer plus the background passes drawn before the queue.
//!
//! [`Renderer`] owns the pixels; rasterizers only ever see it through the
//! borrowed [`FrameBuffer`] view handed out by [`Renderer::as_framebuffer`].

use std::path::Path;

use super::framebuffer::FrameBuffer;
use super::target::RenderTarget;
use crate::colors;

pub struct Renderer {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

/// `width * height` in `usize`, or `None` when it does not fit.
pub fn pixel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}

impl Renderer {
    /// A background-filled buffer. Dimensions whose pixel count overflows
    /// `usize` yield an empty 0x0 renderer.
    pub fn new(width: u32, height: u32) -> Self {
        let mut renderer = Self {
            color_buffer: Vec::new(),
            width: 0,
            height: 0,
        };
        renderer.resize(width, height);
        renderer
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(size) = pixel_count(width, height) else {
            log::error!("{}x{} framebuffer is too large; using 0x0", width, height);
            self.color_buffer = Vec::new();
            self.width = 0;
            self.height = 0;
            return;
        };
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.width = width;
        self.height = height;
        log::debug!("framebuffer resized to {}x{}", width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        if spacing <= 0 {
            return;
        }
        let mut fb = self.as_framebuffer();
        for y in 0..fb.height() as i32 {
            if y % spacing == 0 {
                fb.fill_span(y, 0, fb.width() as i32 - 1, color);
                continue;
            }
            for x in (0..fb.width() as i32).step_by(spacing as usize) {
                fb.fill_pixel(x, y, color);
            }
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let mut fb = self.as_framebuffer();
        for dy in 0..height {
            fb.fill_span(y + dy, x, x + width - 1, color);
        }
    }

    /// Raw ARGB8888 bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8; the
        // byte slice covers exactly the buffer's allocation and borrows self.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color buffer.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(&mut self.color_buffer, self.width, self.height)
    }

    /// Writes the current frame as an RGBA PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        let img = image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let (a, r, g, b) = colors::unpack_argb(self.color_buffer[y as usize * self.width as usize + x as usize]);
            image::Rgba([r, g, b, a])
        });
        img.save(path.as_ref())?;
        log::debug!("frame saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_background() {
        let renderer = Renderer::new(3, 2);
        assert_eq!(renderer.pixels().len(), 6);
        assert!(renderer.pixels().iter().all(|&px| px == colors::BACKGROUND));
        assert_eq!(renderer.as_bytes().len(), 24);
    }

    #[test]
    fn grid_marks_multiples_of_spacing() {
        let mut renderer = Renderer::new(8, 8);
        renderer.clear(0xFF000000);
        renderer.draw_grid(4, colors::GRID);
        let px = |x: usize, y: usize| renderer.pixels()[y * 8 + x];
        assert_eq!(px(0, 3), colors::GRID);
        assert_eq!(px(5, 4), colors::GRID);
        assert_eq!(px(4, 1), colors::GRID);
        assert_eq!(px(1, 1), 0xFF000000);
    }

    #[test]
    fn draw_rect_clips() {
        let mut renderer = Renderer::new(4, 4);
        renderer.clear(0xFF000000);
        renderer.draw_rect(2, 2, 5, 5, 0x00FFFFFF);
        let filled = renderer.pixels().iter().filter(|&&px| px == 0xFFFFFFFF).count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn pixel_count_does_not_wrap() {
        assert_eq!(pixel_count(3, 2), Some(6));
        assert_eq!(pixel_count(0, u32::MAX), Some(0));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(pixel_count(70_000, 70_000), Some(4_900_000_000));
    }

    #[test]
    fn resize_reallocates() {
        let mut renderer = Renderer::new(2, 2);
        renderer.resize(5, 3);
        assert_eq!(renderer.pixels().len(), 15);
        assert_eq!(renderer.as_framebuffer().height(), 3);
    }
}
