//! Network throughput readout
//!
//! ```text
//!   Network
//!   in:  12.34 Mb
//!   out: 512 b
//! ```

use core::fmt::Write;

use heapless::String;
use statglow_display::{DisplayError, Region, RenderSurface, PANEL_WIDTH};

use super::Widget;
use crate::config::NetworkConfig;
use crate::format::{humanize_bytes, RATE_TEXT_LEN};
use crate::interpolate::Glide;
use crate::ramp::{BACKGROUND, HIGHLIGHT};

const LINE_HEIGHT: u16 = 10;
const LABEL_LEN: usize = RATE_TEXT_LEN + 5;

/// Inbound and outbound byte rates
pub struct NetworkWidget {
    x: u16,
    y: u16,
    inbound: Glide,
    outbound: Glide,
}

impl NetworkWidget {
    pub fn new(config: &NetworkConfig) -> Self {
        let channel = Glide::new(0.0, config.glide_ms, 0.0, f32::MAX);
        Self {
            x: config.x,
            y: config.y,
            inbound: channel,
            outbound: channel,
        }
    }

    /// Set new target rates in bytes/sec (negative values clamp to 0)
    pub fn set_rates(&mut self, inbound: f32, outbound: f32, now_ms: u64) {
        self.inbound.retarget(inbound, now_ms);
        self.outbound.retarget(outbound, now_ms);
    }

    /// Displayed (inbound, outbound) rates
    pub fn current(&self) -> (f32, f32) {
        (self.inbound.current(), self.outbound.current())
    }

    /// Target (inbound, outbound) rates
    pub fn target(&self) -> (f32, f32) {
        (self.inbound.target(), self.outbound.target())
    }

    fn draw_rates<S: RenderSurface>(
        &self,
        surface: &mut S,
        inbound: f32,
        outbound: f32,
    ) -> Result<(), DisplayError> {
        let (width, _) = surface.pixel_dimensions();
        let rows = Region::new(
            self.x,
            self.y + LINE_HEIGHT,
            width.saturating_sub(self.x),
            2 * surface.line_height(),
        );
        surface.fill_region(rows, BACKGROUND)?;

        let mut line: String<LABEL_LEN> = String::new();
        write!(line, "in:  {}", humanize_bytes(inbound)).ok();
        surface.draw_text(self.x, self.y + LINE_HEIGHT, &line, HIGHLIGHT)?;

        line.clear();
        write!(line, "out: {}", humanize_bytes(outbound)).ok();
        surface.draw_text(self.x, self.y + 2 * LINE_HEIGHT, &line, HIGHLIGHT)
    }
}

impl Widget for NetworkWidget {
    fn advance(&mut self, now_ms: u64) -> bool {
        if self.inbound.is_settled() && self.outbound.is_settled() {
            return false;
        }
        self.inbound.recompute(now_ms);
        self.outbound.recompute(now_ms);
        true
    }

    fn render<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        let (inbound, outbound) = self.current();
        self.draw_rates(surface, inbound, outbound)
    }

    fn draw_static<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        surface.draw_text(self.x, self.y, "Network", HIGHLIGHT)?;
        self.draw_rates(surface, 0.0, 0.0)
    }

    fn bounds(&self) -> Region {
        Region::new(
            self.x,
            self.y,
            (PANEL_WIDTH as u16).saturating_sub(self.x),
            3 * LINE_HEIGHT,
        )
    }
}
