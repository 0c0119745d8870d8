//! Framebuffer-backed render surface
//!
//! Draw calls land in an indexed [`Framebuffer`]; [`RenderSurface::flush`]
//! converts each dirty rectangle through the [`Palette`] and hands it to a
//! [`PanelSink`].

use crate::backend::{DisplayError, PanelSink, RenderSurface};
use crate::bitmap::Bitmap;
use crate::color::{Palette, PaletteIndex};
use crate::framebuffer::Framebuffer;
use crate::region::Region;

/// Render surface that batches draws in RAM until flushed
pub struct BufferedSurface<'a, P, const W: usize, const H: usize> {
    framebuffer: &'a mut Framebuffer<W, H>,
    palette: Palette,
    sink: P,
}

impl<'a, P: PanelSink, const W: usize, const H: usize> BufferedSurface<'a, P, W, H> {
    /// Create a surface over a framebuffer
    pub fn new(framebuffer: &'a mut Framebuffer<W, H>, palette: Palette, sink: P) -> Self {
        Self {
            framebuffer,
            palette,
            sink,
        }
    }

    /// Access the underlying framebuffer
    pub fn framebuffer(&self) -> &Framebuffer<W, H> {
        self.framebuffer
    }

    /// Access the panel sink
    pub fn sink(&self) -> &P {
        &self.sink
    }
}

impl<P: PanelSink, const W: usize, const H: usize> RenderSurface for BufferedSurface<'_, P, W, H> {
    fn fill_region(&mut self, region: Region, color: PaletteIndex) -> Result<(), DisplayError> {
        self.framebuffer.fill_region(region, color);
        Ok(())
    }

    fn blit<const BW: usize, const BH: usize>(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<BW, BH>,
    ) -> Result<(), DisplayError> {
        self.framebuffer.blit(x, y, bitmap);
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        color: PaletteIndex,
    ) -> Result<(), DisplayError> {
        self.framebuffer.draw_text(x, y, text, color);
        Ok(())
    }

    fn text_width(&self, text: &str) -> u16 {
        Framebuffer::<W, H>::text_width(text)
    }

    fn line_height(&self) -> u16 {
        Framebuffer::<W, H>::line_height()
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        while let Some(region) = self.framebuffer.take_dirty() {
            let framebuffer = &*self.framebuffer;
            let palette = &self.palette;
            let pixels = (region.y..region.bottom()).flat_map(move |y| {
                framebuffer
                    .span(y, region.x, region.width)
                    .iter()
                    .map(move |&index| palette.native(index))
            });

            if let Err(e) = self.sink.write_region(region, pixels) {
                // Retry the same rectangle on the next flush
                self.framebuffer.mark_dirty(region);
                return Err(e);
            }
        }
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }
}
