//! Test doubles shared by the widget and scheduler tests

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use statglow_display::{Bitmap, DisplayError, PaletteIndex, Region, RenderSurface};
use statglow_hal::UartRx;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Fill(Region, PaletteIndex),
    Blit(u16, u16, u16, u16),
    Text(u16, u16, String),
    Flush,
}

/// Render surface that records every call
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    pub fail_draws: bool,
    pub fail_flush: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            fail_draws: false,
            fail_flush: false,
        }
    }

    /// Drawing calls only (flushes excluded)
    pub fn draws(&self) -> usize {
        self.ops.iter().filter(|op| **op != Op::Flush).count()
    }

    pub fn flushes(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::Flush).count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, _, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(Region, PaletteIndex)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(region, color) => Some((*region, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    fn draw(&mut self, op: Op) -> Result<(), DisplayError> {
        if self.fail_draws {
            return Err(DisplayError::Communication);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl RenderSurface for RecordingSurface {
    fn fill_region(&mut self, region: Region, color: PaletteIndex) -> Result<(), DisplayError> {
        self.draw(Op::Fill(region, color))
    }

    fn blit<const W: usize, const H: usize>(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<W, H>,
    ) -> Result<(), DisplayError> {
        self.draw(Op::Blit(x, y, bitmap.width(), bitmap.height()))
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        _color: PaletteIndex,
    ) -> Result<(), DisplayError> {
        self.draw(Op::Text(x, y, String::from(text)))
    }

    fn text_width(&self, text: &str) -> u16 {
        text.len() as u16 * 6
    }

    fn line_height(&self) -> u16 {
        10
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.fail_flush {
            return Err(DisplayError::Communication);
        }
        self.ops.push(Op::Flush);
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (240, 135)
    }
}

/// UART error raised by [`ScriptedUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overrun;

/// UART that hands out queued bytes in scripted chunks
pub struct ScriptedUart {
    bytes: VecDeque<u8>,
    pub max_chunk: usize,
    pub fail_next: bool,
}

impl ScriptedUart {
    pub fn new() -> Self {
        Self {
            bytes: VecDeque::new(),
            max_chunk: usize::MAX,
            fail_next: false,
        }
    }

    pub fn queue(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl UartRx for ScriptedUart {
    type Error = Overrun;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(Overrun);
        }
        let n = buf.len().min(self.max_chunk).min(self.bytes.len());
        for slot in buf.iter_mut().take(n) {
            // n is bounded by the queue length
            *slot = self.bytes.pop_front().unwrap_or_default();
        }
        Ok(n)
    }
}
