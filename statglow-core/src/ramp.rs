//! Heat-map colour ramp
//!
//! The palette holds a red → yellow → green ramp plus two reserved entries:
//!
//! ```text
//!  index   0 ............ 24 ............ 47   48      49
//!  colour  red  →  →  yellow  →  →  →  green  white   black
//!                                             frame   background
//! ```
//!
//! A single gradient bitmap covering the inside of a gauge bar is built once
//! and blitted by every gauge; the unfilled part is then masked over.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use statglow_display::{Bitmap, Palette, PaletteIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of ramp colours
pub const RAMP_STEPS: usize = 48;

/// Bar frame colour (white)
pub const FRAME: PaletteIndex = PaletteIndex(RAMP_STEPS as u8);

/// Text and highlight colour (white)
pub const HIGHLIGHT: PaletteIndex = FRAME;

/// Background and mask colour (black)
pub const BACKGROUND: PaletteIndex = PaletteIndex(RAMP_STEPS as u8 + 1);

/// Outer width of a gauge bar
pub const BAR_WIDTH: u16 = 27;

/// Outer height of a gauge bar
pub const BAR_HEIGHT: u16 = 113;

/// Gradient width (bar minus a one-pixel frame on each side)
pub const GRADIENT_WIDTH: usize = BAR_WIDTH as usize - 2;

/// Gradient height (bar minus a one-pixel frame on each side)
pub const GRADIENT_HEIGHT: usize = BAR_HEIGHT as usize - 2;

/// The shared gauge gradient
pub type Gradient = Bitmap<GRADIENT_WIDTH, GRADIENT_HEIGHT>;

/// Which end of the bar shows the hot colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RampOrientation {
    /// Red at the top; a rising load uncovers it last
    #[default]
    HotTop,
    /// Red at the bottom
    HotBottom,
}

/// Precomputed palette and gradient bitmap
pub struct ColorRamp {
    palette: Palette,
    gradient: Gradient,
    orientation: RampOrientation,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(RampOrientation::default())
    }
}

impl ColorRamp {
    /// Build the palette and gradient
    pub fn new(orientation: RampOrientation) -> Self {
        let mut palette = Palette::new();
        for i in 0..RAMP_STEPS {
            palette.set(PaletteIndex(i as u8), ramp_color(i));
        }
        palette.set(FRAME, Rgb888::WHITE);
        palette.set(BACKGROUND, Rgb888::BLACK);

        let mut gradient = Gradient::new(BACKGROUND);
        for y in 0..GRADIENT_HEIGHT {
            gradient.draw_hline(0, GRADIENT_WIDTH as u16 - 1, y as u16, row_index(y));
        }
        if orientation == RampOrientation::HotBottom {
            gradient.flip_vertical();
        }

        Self {
            palette,
            gradient,
            orientation,
        }
    }

    /// Palette shared with the flush path
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Gauge gradient bitmap
    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    pub fn orientation(&self) -> RampOrientation {
        self.orientation
    }
}

/// Colour of ramp entry `i` (`i < RAMP_STEPS`)
pub fn ramp_color(i: usize) -> Rgb888 {
    let half = RAMP_STEPS / 2;
    if i <= half {
        let g = 255 * i / half;
        Rgb888::new(255, g as u8, 0)
    } else {
        // trunc(255 - 255 * (i - half) / half) with only non-negative terms
        let r = 255 * (RAMP_STEPS - i) / half;
        Rgb888::new(r as u8, 255, 0)
    }
}

/// Ramp index used on gradient row `y` (top to bottom, hot first)
pub fn row_index(y: usize) -> PaletteIndex {
    PaletteIndex((RAMP_STEPS * y / GRADIENT_HEIGHT) as u8)
}
