//! Palette mapping from indexed surfaces to RGBA8 pixels.
use crate::raster::IndexedSurface;

/// Transparent RGBA value used for palette index `0`.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// The 16-color handheld arcade palette. Entry `0` is transparent.
pub const ARCADE_COLORS: [[u8; 4]; 16] = [
    TRANSPARENT,
    [0xff, 0xff, 0xff, 0xff],
    [0xff, 0x21, 0x21, 0xff],
    [0xff, 0x93, 0xc4, 0xff],
    [0xff, 0x81, 0x35, 0xff],
    [0xff, 0xf6, 0x09, 0xff],
    [0x24, 0x9c, 0xa3, 0xff],
    [0x78, 0xdc, 0x52, 0xff],
    [0x00, 0x3f, 0xad, 0xff],
    [0x87, 0xf2, 0xff, 0xff],
    [0x8e, 0x2e, 0xc4, 0xff],
    [0xa4, 0x83, 0x9f, 0xff],
    [0x5c, 0x40, 0x6c, 0xff],
    [0xe5, 0xcd, 0xc4, 0xff],
    [0x91, 0x46, 0x3d, 0xff],
    [0x00, 0x00, 0x00, 0xff],
];

/// Maps palette indices to RGBA8 colors, wrapping indices past the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
}

impl Palette {
    /// Creates a palette from explicit colors. An empty list yields an all-transparent palette.
    pub fn new(colors: Vec<[u8; 4]>) -> Self {
        Self { colors }
    }

    pub fn arcade() -> Self {
        Self::new(ARCADE_COLORS.to_vec())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// RGBA color for `index`.
    #[inline]
    pub fn rgba(&self, index: u8) -> [u8; 4] {
        if self.colors.is_empty() {
            return TRANSPARENT;
        }
        self.colors[index as usize % self.colors.len()]
    }

    /// Writes `surface` as tightly packed RGBA8 into `out`.
    /// Pixels past the end of `out` are skipped.
    pub fn write_rgba(&self, surface: &IndexedSurface, out: &mut [u8]) {
        for (dst, index) in out.chunks_exact_mut(4).zip(surface.as_slice()) {
            dst.copy_from_slice(&self.rgba(*index));
        }
    }

    /// Converts `surface` into a new RGBA8 buffer.
    pub fn to_rgba(&self, surface: &IndexedSurface) -> Vec<u8> {
        let mut out = vec![0; surface.as_slice().len() * 4];
        self.write_rgba(surface, &mut out);
        out
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::arcade()
    }
}
