//! Indexed colour support
//!
//! The framebuffer stores one palette index per pixel. Conversion to the
//! panel's native RGB565 happens once per pixel at flush time through a
//! precomputed lookup table.

use embedded_graphics::pixelcolor::raw::RawU8;
use embedded_graphics::pixelcolor::{PixelColor, Rgb565, Rgb888};
use embedded_graphics::prelude::RgbColor;

/// Number of addressable palette entries
pub const PALETTE_SIZE: usize = 256;

/// A palette index stored in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaletteIndex(pub u8);

impl PaletteIndex {
    /// Raw index value
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

impl From<u8> for PaletteIndex {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Index-to-colour lookup table
///
/// Unassigned entries are black.
#[derive(Clone)]
pub struct Palette {
    colors: [Rgb888; PALETTE_SIZE],
    native: [Rgb565; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Create an all-black palette
    pub fn new() -> Self {
        Self {
            colors: [Rgb888::BLACK; PALETTE_SIZE],
            native: [Rgb565::BLACK; PALETTE_SIZE],
        }
    }

    /// Assign a colour to an index
    pub fn set(&mut self, index: PaletteIndex, color: Rgb888) {
        self.colors[index.0 as usize] = color;
        self.native[index.0 as usize] = Rgb565::from(color);
    }

    /// Colour assigned to an index
    pub fn get(&self, index: PaletteIndex) -> Rgb888 {
        self.colors[index.0 as usize]
    }

    /// Panel-native colour for an index
    pub fn native(&self, index: PaletteIndex) -> Rgb565 {
        self.native[index.0 as usize]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Palette {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Palette[{} entries]", PALETTE_SIZE);
    }
}
