//! Fixed-size indexed bitmaps for blitting

use crate::color::PaletteIndex;

/// An off-screen W×H bitmap of palette indices
#[derive(Clone)]
pub struct Bitmap<const W: usize, const H: usize> {
    rows: [[PaletteIndex; W]; H],
}

impl<const W: usize, const H: usize> Bitmap<W, H> {
    /// Create a bitmap filled with one index
    pub const fn new(fill: PaletteIndex) -> Self {
        Self {
            rows: [[fill; W]; H],
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        W as u16
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        H as u16
    }

    /// Read a pixel (`None` when out of bounds)
    pub fn pixel(&self, x: u16, y: u16) -> Option<PaletteIndex> {
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// Write a pixel, ignoring out-of-bounds coordinates
    pub fn set_pixel(&mut self, x: u16, y: u16, color: PaletteIndex) {
        if let Some(px) = self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *px = color;
        }
    }

    /// Draw a horizontal line from `x1` to `x2` inclusive
    pub fn draw_hline(&mut self, x1: u16, x2: u16, y: u16, color: PaletteIndex) {
        if let Some(row) = self.rows.get_mut(y as usize) {
            let start = (x1.min(x2) as usize).min(W);
            let end = (x1.max(x2) as usize + 1).min(W);
            row[start..end].fill(color);
        }
    }

    /// One row of pixels
    pub fn row(&self, y: u16) -> &[PaletteIndex] {
        self.rows.get(y as usize).map(|r| &r[..]).unwrap_or(&[])
    }

    /// Iterate over rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[PaletteIndex]> {
        self.rows.iter().map(|r| &r[..])
    }

    /// Flip the bitmap vertically in place
    pub fn flip_vertical(&mut self) {
        self.rows.reverse();
    }
}
