//! Render surface traits
//!
//! Defines the interface widgets draw through and the interface a panel
//! driver implements to receive flushed pixels.

use embedded_graphics::pixelcolor::Rgb565;

use crate::bitmap::Bitmap;
use crate::color::PaletteIndex;
use crate::region::Region;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI or GPIO failure while talking to the panel
    Communication,
}

/// Pixel-addressable drawing surface
///
/// Drawing calls only touch memory; nothing reaches the panel until
/// [`RenderSurface::flush`] is called, so several widget updates can share
/// one device transfer. Coordinates outside the surface are clipped.
pub trait RenderSurface {
    /// Fill a rectangle with one palette index
    fn fill_region(&mut self, region: Region, color: PaletteIndex) -> Result<(), DisplayError>;

    /// Draw a horizontal line starting at (`x`, `y`)
    fn draw_hline(
        &mut self,
        x: u16,
        y: u16,
        length: u16,
        color: PaletteIndex,
    ) -> Result<(), DisplayError> {
        self.fill_region(Region::new(x, y, length, 1), color)
    }

    /// Draw a vertical line starting at (`x`, `y`)
    fn draw_vline(
        &mut self,
        x: u16,
        y: u16,
        length: u16,
        color: PaletteIndex,
    ) -> Result<(), DisplayError> {
        self.fill_region(Region::new(x, y, 1, length), color)
    }

    /// Copy a bitmap with its top-left corner at (`x`, `y`)
    fn blit<const W: usize, const H: usize>(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<W, H>,
    ) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// Only glyph pixels are written; callers clear the background first.
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        color: PaletteIndex,
    ) -> Result<(), DisplayError>;

    /// Rendered width of `text` in pixels
    fn text_width(&self, text: &str) -> u16;

    /// Height of one text line in pixels
    fn line_height(&self) -> u16;

    /// Push pending changes to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Surface size as (width, height) in pixels
    fn pixel_dimensions(&self) -> (u16, u16);
}

/// Panel-side receiver for flushed pixels
///
/// Implemented by display drivers. Pixels arrive row-major, left to right,
/// top to bottom, exactly `region.area()` of them.
pub trait PanelSink {
    /// Write a rectangle of pixels to the panel
    fn write_region<I>(&mut self, region: Region, pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>;
}
