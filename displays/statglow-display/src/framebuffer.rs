//! Indexed framebuffer with dirty-region tracking
//!
//! One byte per pixel. Writes are tracked as a short list of dirty
//! rectangles, so a flush only transfers what changed and two widgets at
//! opposite ends of the panel do not drag the space between them along.
//!
//! ```text
//!   ┌──┐            ┌────────┐
//!   │g │            │net     │   two dirty rectangles,
//!   │  │            └────────┘   not one 240-wide box
//!   └──┘
//! ```
//!
//! Overlapping rectangles are merged. When all slots are taken the new
//! rectangle is folded into whichever existing one grows the least.

use core::convert::Infallible;

use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::{Drawable, Pixel};
use embedded_graphics::draw_target::DrawTarget;
use heapless::Vec;

use crate::bitmap::Bitmap;
use crate::color::PaletteIndex;
use crate::region::Region;

/// Font used for all captions
pub const TEXT_FONT: MonoFont<'static> = FONT_6X10;

/// Panel width in pixels (ST7789 240x135 module)
pub const PANEL_WIDTH: usize = 240;

/// Panel height in pixels
pub const PANEL_HEIGHT: usize = 135;

/// Dirty rectangles tracked before they are folded together
pub const MAX_DIRTY_REGIONS: usize = 8;

/// Framebuffer sized for the panel
pub type PanelFramebuffer = Framebuffer<PANEL_WIDTH, PANEL_HEIGHT>;

/// W×H indexed framebuffer
pub struct Framebuffer<const W: usize, const H: usize> {
    pixels: [[PaletteIndex; W]; H],
    dirty: Vec<Region, MAX_DIRTY_REGIONS>,
    /// Whole buffer needs sending, regardless of `dirty`
    full: bool,
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    /// Create a framebuffer filled with one index
    ///
    /// The whole buffer starts dirty so the first flush paints the panel.
    pub const fn new(fill: PaletteIndex) -> Self {
        Self {
            pixels: [[fill; W]; H],
            dirty: Vec::new(),
            full: true,
        }
    }

    /// Full-screen region
    pub const fn bounds(&self) -> Region {
        Region::new(0, 0, W as u16, H as u16)
    }

    /// Read a pixel (`None` when out of bounds)
    pub fn pixel(&self, x: u16, y: u16) -> Option<PaletteIndex> {
        self.pixels.get(y as usize)?.get(x as usize).copied()
    }

    /// Write a pixel, ignoring out-of-bounds coordinates
    pub fn set_pixel(&mut self, x: u16, y: u16, color: PaletteIndex) {
        if (x as usize) < W && (y as usize) < H {
            self.pixels[y as usize][x as usize] = color;
            self.mark_dirty(Region::new(x, y, 1, 1));
        }
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_region(&mut self, region: Region, color: PaletteIndex) {
        let clipped = region.intersect(&self.bounds());
        if clipped.is_empty() {
            return;
        }
        for row in &mut self.pixels[clipped.y as usize..clipped.bottom() as usize] {
            row[clipped.x as usize..clipped.right() as usize].fill(color);
        }
        self.mark_dirty(clipped);
    }

    /// Copy a bitmap into the buffer, clipped to the buffer
    pub fn blit<const BW: usize, const BH: usize>(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<BW, BH>,
    ) {
        let target = Region::new(x, y, bitmap.width(), bitmap.height());
        let clipped = target.intersect(&self.bounds());
        if clipped.is_empty() {
            return;
        }
        let src_x = (clipped.x - x) as usize;
        let width = clipped.width as usize;
        for dy in 0..clipped.height {
            let src = bitmap.row(clipped.y - y + dy);
            let dst = &mut self.pixels[(clipped.y + dy) as usize];
            dst[clipped.x as usize..clipped.x as usize + width]
                .copy_from_slice(&src[src_x..src_x + width]);
        }
        self.mark_dirty(clipped);
    }

    /// Draw text in [`TEXT_FONT`] with its top-left corner at (`x`, `y`)
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, color: PaletteIndex) {
        let style = MonoTextStyle::new(&TEXT_FONT, color);
        let origin = Point::new(i32::from(x), i32::from(y));
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(self)
            .ok();
    }

    /// Width of `text` in [`TEXT_FONT`]
    pub fn text_width(text: &str) -> u16 {
        let advance = TEXT_FONT.character_size.width + TEXT_FONT.character_spacing;
        (text.chars().count() as u32 * advance) as u16
    }

    /// Height of one line of [`TEXT_FONT`]
    pub const fn line_height() -> u16 {
        TEXT_FONT.character_size.height as u16
    }

    /// A horizontal run of pixels on one row
    pub fn span(&self, y: u16, x: u16, width: u16) -> &[PaletteIndex] {
        match self.pixels.get(y as usize) {
            Some(row) => {
                let start = (x as usize).min(W);
                let end = (x as usize + width as usize).min(W);
                &row[start..end]
            }
            None => &[],
        }
    }

    /// Bounding box of everything dirty
    pub fn dirty(&self) -> Option<Region> {
        if self.full {
            return Some(self.bounds());
        }
        self.dirty
            .iter()
            .copied()
            .reduce(|acc, region| acc.union(&region))
    }

    /// Dirty rectangles not yet flushed
    ///
    /// Empty while a full repaint is pending.
    pub fn dirty_regions(&self) -> &[Region] {
        &self.dirty
    }

    /// Take one dirty rectangle, or `None` when the buffer is clean
    pub fn take_dirty(&mut self) -> Option<Region> {
        if self.full {
            self.full = false;
            self.dirty.clear();
            return Some(self.bounds());
        }
        self.dirty.pop()
    }

    /// Record that `region` changed
    pub fn mark_dirty(&mut self, region: Region) {
        if region.is_empty() || self.full {
            return;
        }
        if region == self.bounds() {
            self.full = true;
            self.dirty.clear();
            return;
        }

        let mut merged = region;
        let mut i = 0;
        while i < self.dirty.len() {
            if self.dirty[i].intersect(&merged).is_empty() {
                i += 1;
            } else {
                // Restart: the grown rectangle may now reach earlier ones
                merged = merged.union(&self.dirty.swap_remove(i));
                i = 0;
            }
        }

        if let Err(merged) = self.dirty.push(merged) {
            let cheapest = self
                .dirty
                .iter()
                .enumerate()
                .min_by_key(|(_, existing)| existing.union(&merged).area() - existing.area())
                .map(|(i, _)| i);
            if let Some(i) = cheapest {
                let folded = self.dirty.swap_remove(i).union(&merged);
                self.mark_dirty(folded);
            }
        }
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Framebuffer<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for Framebuffer<W, H> {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let mut touched: Option<Region> = None;
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if (x as usize) < W && (y as usize) < H {
                self.pixels[y as usize][x as usize] = color;
                let pixel = Region::new(x, y, 1, 1);
                touched = Some(touched.map_or(pixel, |r| r.union(&pixel)));
            }
        }
        // One rectangle per draw call rather than one per glyph pixel
        if let Some(region) = touched {
            self.mark_dirty(region);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: PaletteIndex = PaletteIndex(49);
    const FG: PaletteIndex = PaletteIndex(48);

    type SmallFb = Framebuffer<32, 16>;

    #[test]
    fn test_new_is_fully_dirty() {
        let mut fb = SmallFb::new(BG);
        assert_eq!(fb.take_dirty(), Some(Region::new(0, 0, 32, 16)));
        assert_eq!(fb.dirty(), None);
    }

    #[test]
    fn test_fill_region_clips_and_marks_dirty() {
        let mut fb = SmallFb::new(BG);
        fb.take_dirty();

        fb.fill_region(Region::new(30, 14, 10, 10), FG);
        assert_eq!(fb.pixel(31, 15), Some(FG));
        assert_eq!(fb.pixel(29, 15), Some(BG));
        assert_eq!(fb.dirty(), Some(Region::new(30, 14, 2, 2)));
    }

    #[test]
    fn test_disjoint_writes_stay_separate() {
        let mut fb = SmallFb::new(BG);
        fb.take_dirty();

        fb.fill_region(Region::new(0, 0, 2, 2), FG);
        fb.fill_region(Region::new(10, 5, 2, 2), FG);
        assert_eq!(
            fb.dirty_regions(),
            [Region::new(0, 0, 2, 2), Region::new(10, 5, 2, 2)]
        );
        assert_eq!(fb.dirty(), Some(Region::new(0, 0, 12, 7)));

        assert_eq!(fb.take_dirty(), Some(Region::new(10, 5, 2, 2)));
        assert_eq!(fb.take_dirty(), Some(Region::new(0, 0, 2, 2)));
        assert_eq!(fb.take_dirty(), None);
    }

    #[test]
    fn test_overlapping_writes_merge() {
        let mut fb = SmallFb::new(BG);
        fb.take_dirty();

        fb.fill_region(Region::new(0, 0, 4, 4), FG);
        fb.fill_region(Region::new(20, 0, 4, 4), FG);
        // Bridges both earlier rectangles
        fb.fill_region(Region::new(2, 2, 20, 1), FG);
        assert_eq!(fb.dirty_regions(), [Region::new(0, 0, 24, 4)]);
    }

    #[test]
    fn test_full_slots_fold_into_cheapest() {
        let mut fb: Framebuffer<64, 8> = Framebuffer::new(BG);
        fb.take_dirty();

        for i in 0..MAX_DIRTY_REGIONS as u16 {
            fb.set_pixel(i * 8, 0, FG);
        }
        assert_eq!(fb.dirty_regions().len(), MAX_DIRTY_REGIONS);

        // Next to the pixel at x=8; folding there costs the least
        fb.set_pixel(9, 1, FG);
        let regions = fb.dirty_regions();
        assert_eq!(regions.len(), MAX_DIRTY_REGIONS);
        assert!(regions.contains(&Region::new(8, 0, 2, 2)));
        assert!(regions.contains(&Region::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_whole_buffer_write_is_one_region() {
        let mut fb = SmallFb::new(BG);
        fb.take_dirty();

        fb.fill_region(Region::new(3, 3, 2, 2), FG);
        fb.fill_region(fb.bounds(), BG);
        fb.fill_region(Region::new(3, 3, 2, 2), FG);
        assert_eq!(fb.take_dirty(), Some(Region::new(0, 0, 32, 16)));
        assert_eq!(fb.take_dirty(), None);
    }

    #[test]
    fn test_blit_copies_and_clips() {
        let mut bmp: Bitmap<4, 3> = Bitmap::new(PaletteIndex(1));
        bmp.set_pixel(3, 2, PaletteIndex(2));

        let mut fb = SmallFb::new(BG);
        fb.take_dirty();
        fb.blit(29, 14, &bmp);

        assert_eq!(fb.pixel(29, 14), Some(PaletteIndex(1)));
        assert_eq!(fb.pixel(31, 15), Some(PaletteIndex(1)));
        assert_eq!(fb.dirty(), Some(Region::new(29, 14, 3, 2)));

        fb.blit(0, 0, &bmp);
        assert_eq!(fb.pixel(3, 2), Some(PaletteIndex(2)));
        assert_eq!(fb.pixel(4, 2), Some(BG));
    }

    #[test]
    fn test_draw_text_touches_only_text_box() {
        let mut fb = SmallFb::new(BG);
        fb.take_dirty();
        fb.draw_text(2, 3, "8", FG);

        assert_eq!(fb.dirty_regions().len(), 1);
        let dirty = fb.dirty().unwrap();
        assert!(dirty.x >= 2 && dirty.right() <= 2 + SmallFb::text_width("8"));
        assert!(dirty.y >= 3 && dirty.bottom() <= 3 + SmallFb::line_height());

        let lit = (0..16u16)
            .flat_map(|y| (0..32u16).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y) == Some(FG))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_text_width_uses_font_advance() {
        assert_eq!(SmallFb::text_width(""), 0);
        assert_eq!(SmallFb::text_width("0%"), 12);
        assert_eq!(SmallFb::text_width("100%"), 24);
        assert_eq!(SmallFb::line_height(), 10);
    }

    #[test]
    fn test_span_is_clipped() {
        let fb = SmallFb::new(BG);
        assert_eq!(fb.span(0, 30, 10).len(), 2);
        assert!(fb.span(99, 0, 4).is_empty());
    }
}
