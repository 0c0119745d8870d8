//! On-screen widgets
//!
//! Each widget owns its animated state and a fixed rectangle of the panel.
//! The scheduler drives them in two steps per iteration:
//!
//! ```text
//!   advance(now) ──► changed? ──yes──► render(surface)
//!                       │
//!                       no ──► nothing drawn
//! ```
//!
//! `draw_static` paints the parts that never change (captions, headings)
//! once at boot.

mod gauge;
mod network;
mod temperature;

pub use gauge::{mask_rows, Gauge, CAPTION_Y, LOAD_CAPTION_Y};
pub use network::NetworkWidget;
pub use temperature::TemperatureWidget;

use statglow_display::{DisplayError, Region, RenderSurface};

/// Common widget interface
pub trait Widget {
    /// Move animated values toward their targets
    ///
    /// Returns `true` when the widget needs to be redrawn.
    fn advance(&mut self, now_ms: u64) -> bool;

    /// Draw the changing parts of the widget
    fn render<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError>;

    /// Draw the parts that never change
    fn draw_static<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError>;

    /// Rectangle the widget may draw into
    fn bounds(&self) -> Region;
}

/// Two widgets would draw into the same pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutError {
    pub first: &'static str,
    pub second: &'static str,
    /// Pixels both widgets claim
    pub overlap: Region,
}

/// Reject a layout where any two named rectangles share a pixel
pub fn check_layout(areas: &[(&'static str, Region)]) -> Result<(), LayoutError> {
    for (i, &(first, a)) in areas.iter().enumerate() {
        for &(second, b) in &areas[i + 1..] {
            let overlap = a.intersect(&b);
            if !overlap.is_empty() {
                return Err(LayoutError {
                    first,
                    second,
                    overlap,
                });
            }
        }
    }
    Ok(())
}
