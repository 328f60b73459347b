//! Bresenham line point generator.
//!
//! Integer-only walk over the lattice points approximating a segment. The
//! walk always advances one unit along the major axis; the decision
//! parameter decides whether the minor axis steps too:
//!
//! ```text
//! P0      = 2*dy - dx
//! P < 0   -> P += 2*dy          (major step only)
//! P >= 0  -> P += 2*dy - 2*dx   (major and minor step)
//! ```
//!
//! Endpoints are put in a canonical order first (steep lines swap x/y, then
//! the walk starts at the lower major-axis coordinate), so `(a, b)` and
//! `(b, a)` produce the same points in the same order. Scanline
//! rasterizers rely on that when two triangles share an edge.
//!
//! State is kept in `i64`, so any pair of `i32` endpoints walks without
//! overflow, and [`BresenhamLine::restrict_major`] jumps straight to a
//! window of the walk instead of stepping through points a caller would
//! discard.

use std::iter::FusedIterator;

#[derive(Debug, Clone)]
pub struct BresenhamLine {
    /// Current position in the (possibly x/y-swapped) walking frame.
    major: i64,
    minor: i64,
    major_start: i64,
    minor_start: i64,
    major_end: i64,
    d_major: i64,
    d_minor: i64,
    minor_step: i64,
    decision: i64,
    steep: bool,
    exhausted: bool,
}

impl BresenhamLine {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let mut line = Self {
            major: 0,
            minor: 0,
            major_start: 0,
            minor_start: 0,
            major_end: 0,
            d_major: 0,
            d_minor: 0,
            minor_step: 1,
            decision: 0,
            steep: false,
            exhausted: true,
        };
        line.init(x1, y1, x2, y2);
        line
    }

    /// Resets the generator onto a new segment. Both endpoints are emitted.
    pub fn init(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        let steep = (y2 - y1).abs() > (x2 - x1).abs();
        let (mut a, mut b) = if steep {
            ((y1, x1), (y2, x2))
        } else {
            ((x1, y1), (x2, y2))
        };
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }

        let d_major = b.0 - a.0;
        let d_minor = (b.1 - a.1).abs();

        self.major = a.0;
        self.minor = a.1;
        self.major_start = a.0;
        self.minor_start = a.1;
        self.major_end = b.0;
        self.d_major = d_major;
        self.d_minor = d_minor;
        self.minor_step = if b.1 < a.1 { -1 } else { 1 };
        self.decision = 2 * d_minor - d_major;
        self.steep = steep;
        self.exhausted = false;
    }

    /// Whether the major axis is y.
    pub fn is_steep(&self) -> bool {
        self.steep
    }

    /// Limits the rest of the walk to major-axis coordinates in `lo..=hi`
    /// (x for shallow lines, y for steep ones). The points that remain are
    /// exactly the ones the unrestricted walk would produce there.
    pub fn restrict_major(&mut self, lo: i32, hi: i32) {
        if self.exhausted {
            return;
        }
        self.major_end = self.major_end.min(hi as i64);
        let lo = lo as i64;
        if lo > self.major {
            self.jump_to(lo);
        }
        if self.major > self.major_end {
            self.exhausted = true;
        }
    }

    /// Moves to major coordinate `major`, computing the minor coordinate and
    /// decision value in closed form: after `k` steps the minor offset is
    /// `floor((2k * d_minor + d_major) / (2 * d_major))`.
    fn jump_to(&mut self, major: i64) {
        if self.d_major == 0 {
            self.major = major;
            return;
        }
        // Products reach 2^65 for extreme endpoints.
        let k = (major - self.major_start) as i128;
        let (d_major, d_minor) = (self.d_major as i128, self.d_minor as i128);
        let offset = (2 * k * d_minor + d_major).div_euclid(2 * d_major);
        let decision = 2 * d_minor * (k + 1) - d_major * (2 * offset + 1);

        self.major = major;
        self.minor = self.minor_start + self.minor_step * offset as i64;
        self.decision = decision as i64;
    }

    fn current(&self) -> (i32, i32) {
        // Every point lies between two i32 endpoints.
        let (major, minor) = (self.major as i32, self.minor as i32);
        if self.steep {
            (minor, major)
        } else {
            (major, minor)
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let point = self.current();
        if self.major == self.major_end {
            self.exhausted = true;
            return Some(point);
        }

        self.major += 1;
        if self.decision < 0 {
            self.decision += 2 * self.d_minor;
        } else {
            self.minor += self.minor_step;
            self.decision += 2 * self.d_minor - 2 * self.d_major;
        }
        Some(point)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len() {
            self.exhausted = true;
            return None;
        }
        if n > 0 {
            self.jump_to(self.major + n as i64);
        }
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.exhausted {
            0
        } else {
            (self.major_end - self.major) as usize + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BresenhamLine {}

impl FusedIterator for BresenhamLine {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_includes_both_endpoints() {
        let points: Vec<_> = BresenhamLine::new(0, 0, 10, 10).collect();
        assert_eq!(points.len(), 11);
        assert_eq!(points.first(), Some(&(0, 0)));
        assert_eq!(points.last(), Some(&(10, 10)));
        for pair in points.windows(2) {
            assert_eq!(pair[1].0 - pair[0].0, 1);
        }
    }

    #[test]
    fn exhausted_generator_stays_exhausted() {
        let mut line = BresenhamLine::new(3, 4, 3, 4);
        assert_eq!(line.next(), Some((3, 4)));
        assert_eq!(line.next(), None);
        assert_eq!(line.next(), None);
    }

    #[test]
    fn init_restarts_the_walk() {
        let mut line = BresenhamLine::new(0, 0, 2, 0);
        assert_eq!(line.next(), Some((0, 0)));
        line.init(5, 5, 5, 7);
        let rest: Vec<_> = line.collect();
        assert_eq!(rest, vec![(5, 5), (5, 6), (5, 7)]);
    }

    #[test]
    fn shallow_line_matches_classic_pattern() {
        let points: Vec<_> = BresenhamLine::new(0, 0, 8, 3).collect();
        assert_eq!(
            points,
            vec![
                (0, 0),
                (1, 0),
                (2, 1),
                (3, 1),
                (4, 2),
                (5, 2),
                (6, 2),
                (7, 3),
                (8, 3)
            ]
        );
    }

    #[test]
    fn steep_line_advances_along_y() {
        let line = BresenhamLine::new(0, 0, 2, 6);
        assert!(line.is_steep());
        let points: Vec<_> = line.collect();
        assert_eq!(points.len(), 7);
        for pair in points.windows(2) {
            assert_eq!(pair[1].1 - pair[0].1, 1);
            assert!((pair[1].0 - pair[0].0).abs() <= 1);
        }
        assert_eq!(points.last(), Some(&(2, 6)));
    }

    #[test]
    fn direction_does_not_change_the_points() {
        for (x1, y1, x2, y2) in [(0, 0, 7, 3), (2, 9, 5, -4), (-3, 1, 4, 1), (6, 0, 0, 6)] {
            let forward: Vec<_> = BresenhamLine::new(x1, y1, x2, y2).collect();
            let backward: Vec<_> = BresenhamLine::new(x2, y2, x1, y1).collect();
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn size_hint_counts_remaining_points() {
        let mut line = BresenhamLine::new(0, 0, 4, 1);
        assert_eq!(line.len(), 5);
        line.next();
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let mut line = BresenhamLine::new(-(1 << 30), 0, 1 << 30, 0);
        assert_eq!(line.len(), (1usize << 31) + 1);
        assert_eq!(line.next(), Some((-(1 << 30), 0)));
        let before_last = line.len() - 1;
        assert_eq!(line.nth(before_last), Some((1 << 30, 0)));
        assert_eq!(line.next(), None);

        let mut diagonal = BresenhamLine::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(diagonal.nth(1), Some((i32::MIN + 1, i32::MIN + 1)));
    }

    #[test]
    fn nth_matches_stepping() {
        for (x1, y1, x2, y2) in [(0, 0, 37, 11), (5, -3, -20, 40), (-7, 2, 9, -13)] {
            let all: Vec<_> = BresenhamLine::new(x1, y1, x2, y2).collect();
            for n in 0..all.len() {
                let mut line = BresenhamLine::new(x1, y1, x2, y2);
                assert_eq!(line.nth(n), Some(all[n]));
                // The walk continues from the jumped-to point.
                assert_eq!(line.next(), all.get(n + 1).copied());
            }
            assert_eq!(BresenhamLine::new(x1, y1, x2, y2).nth(all.len()), None);
        }
    }

    #[test]
    fn restrict_major_keeps_the_same_points() {
        let all: Vec<_> = BresenhamLine::new(-10, 3, 30, 17).collect();
        let mut line = BresenhamLine::new(-10, 3, 30, 17);
        line.restrict_major(0, 15);
        let window: Vec<_> = line.collect();
        let expected: Vec<_> = all.into_iter().filter(|p| (0..=15).contains(&p.0)).collect();
        assert_eq!(window, expected);

        let mut outside = BresenhamLine::new(0, 0, 5, 1);
        outside.restrict_major(10, 20);
        assert_eq!(outside.len(), 0);
        assert_eq!(outside.next(), None);
    }
}
