//! The drawing capability the rasterizers depend on.

use std::collections::HashMap;

use super::line::BresenhamLine;

/// Anything that can take pixel fills in device space.
///
/// Rasterizers only ever borrow a target for the duration of a draw; they
/// never allocate or free it. Colors are packed `0xAARRGGBB` (see
/// [`crate::colors`] for the alpha convention).
pub trait RenderTarget {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fills one pixel. Out-of-bounds coordinates are ignored.
    fn fill_pixel(&mut self, x: i32, y: i32, color: u32);

    /// Fills `x_start..=x_end` on row `y`.
    fn fill_span(&mut self, y: i32, x_start: i32, x_end: i32, color: u32) {
        for x in x_start..=x_end {
            self.fill_pixel(x, y, color);
        }
    }

    /// Draws a segment with the Bresenham generator, both endpoints included.
    ///
    /// Only the part of the walk whose major coordinate falls inside the
    /// target is generated, so far-away endpoints cost nothing extra.
    fn draw_line(&mut self, p1: (i32, i32), p2: (i32, i32), color: u32) {
        let mut line = BresenhamLine::new(p1.0, p1.1, p2.0, p2.1);
        let extent = if line.is_steep() {
            self.height()
        } else {
            self.width()
        };
        line.restrict_major(0, extent.min(i32::MAX as u32) as i32 - 1);
        for (x, y) in line {
            self.fill_pixel(x, y, color);
        }
    }
}

/// Target that records every fill instead of storing colors.
///
/// Useful for coverage analysis: which pixels a rasterizer touched and how
/// many times.
#[derive(Debug, Clone, Default)]
pub struct PixelRecorder {
    width: u32,
    height: u32,
    fills: HashMap<(i32, i32), u32>,
    order: Vec<(i32, i32, u32)>,
}

impl PixelRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// How many times `(x, y)` was filled.
    pub fn count(&self, x: i32, y: i32) -> u32 {
        self.fills.get(&(x, y)).copied().unwrap_or(0)
    }

    /// Distinct pixels filled at least once.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.fills.keys().copied()
    }

    pub fn distinct(&self) -> usize {
        self.fills.len()
    }

    /// Total fills, overdraw included.
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Pixels filled more than once.
    pub fn overdrawn(&self) -> usize {
        self.fills.values().filter(|&&n| n > 1).count()
    }

    /// Every fill in submission order, with its color.
    pub fn fills(&self) -> &[(i32, i32, u32)] {
        &self.order
    }

    /// Filled x coordinates on row `y`, sorted.
    pub fn row(&self, y: i32) -> Vec<i32> {
        let mut xs: Vec<i32> = self
            .fills
            .keys()
            .filter(|&&(_, py)| py == y)
            .map(|&(x, _)| x)
            .collect();
        xs.sort_unstable();
        xs
    }

    pub fn clear(&mut self) {
        self.fills.clear();
        self.order.clear();
    }
}

impl RenderTarget for PixelRecorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            *self.fills.entry((x, y)).or_insert(0) += 1;
            self.order.push((x, y, color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_overdraw_and_ignores_out_of_bounds() {
        let mut rec = PixelRecorder::new(4, 4);
        rec.fill_pixel(1, 1, 0);
        rec.fill_pixel(1, 1, 0);
        rec.fill_pixel(-1, 0, 0);
        rec.fill_pixel(4, 0, 0);
        assert_eq!(rec.count(1, 1), 2);
        assert_eq!(rec.distinct(), 1);
        assert_eq!(rec.total(), 2);
        assert_eq!(rec.overdrawn(), 1);
    }

    #[test]
    fn draw_line_uses_bresenham_points() {
        let mut rec = PixelRecorder::new(16, 16);
        rec.draw_line((0, 0), (8, 3), 0xFF);
        assert_eq!(rec.distinct(), 9);
        assert_eq!(rec.count(4, 2), 1);
        assert_eq!(rec.count(8, 3), 1);
    }

    #[test]
    fn draw_line_walks_only_the_visible_part() {
        let mut rec = PixelRecorder::new(16, 16);
        rec.draw_line((-(1 << 30), 5), (1 << 30, 5), 0xFF);
        assert_eq!(rec.row(5), (0..16).collect::<Vec<_>>());
        assert_eq!(rec.total(), 16);

        rec.clear();
        rec.draw_line((-1000, -1000), (1000, 1000), 0xFF);
        assert_eq!(rec.distinct(), 16);
        assert_eq!(rec.count(15, 15), 1);

        rec.clear();
        rec.draw_line((40, 0), (90, 3), 0xFF);
        assert_eq!(rec.total(), 0);
    }
}
