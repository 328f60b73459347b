//! Color constants and packing helpers.
//!
//! Packed colors are `0xAARRGGBB`. Alpha 0 means "opaque, no blending"; any
//! other alpha blends the source over the destination with that weight.

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const GRID: u32 = 0xFF333333;
/// Outline color for mixed render mode (alpha 0: opaque overwrite).
pub const OUTLINE: u32 = 0x00000000;
pub const WHITE: u32 = 0xFFFFFFFF;

/// Per-vertex RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::gray(255)
    }
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque-looking grayscale: RGB all `level`, alpha 255.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level, 255)
    }

    /// Packs into `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        pack_argb(self.a, self.r, self.g, self.b)
    }

    pub fn from_argb(color: u32) -> Self {
        let (a, r, g, b) = unpack_argb(color);
        Self::new(r, g, b, a)
    }
}

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
pub fn unpack_argb(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Writes `src` over `dst` following the alpha convention. The result is
/// always stored fully opaque.
#[inline]
pub fn blend(dst: u32, src: u32) -> u32 {
    let (a, sr, sg, sb) = unpack_argb(src);
    if a == 0 {
        return src | 0xFF00_0000;
    }
    let (_, dr, dg, db) = unpack_argb(dst);
    let mix = |s: u8, d: u8| -> u8 {
        ((s as u32 * a as u32 + d as u32 * (255 - a as u32) + 127) / 255) as u8
    };
    pack_argb(0xFF, mix(sr, dr), mix(sg, dg), mix(sb, db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trip() {
        let c = Color::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_argb(), 0x78123456);
        assert_eq!(Color::from_argb(0x78123456), c);
    }

    #[test]
    fn alpha_zero_overwrites() {
        assert_eq!(blend(0xFFFFFFFF, 0x00000000), 0xFF000000);
        assert_eq!(blend(0xFF101010, 0x00ABCDEF), 0xFFABCDEF);
    }

    #[test]
    fn full_alpha_replaces_and_half_alpha_mixes() {
        assert_eq!(blend(0xFF000000, 0xFFFF8040), 0xFFFF8040);
        let mixed = blend(0xFF000000, 0x80FFFFFF);
        let (_, r, g, b) = unpack_argb(mixed);
        assert_eq!((r, g, b), (128, 128, 128));
    }
}
