//! Temperature readout
//!
//! Shows the host's CPU temperature in whole degrees. There is no glide;
//! the line is redrawn only when the whole-degree value changes.

use core::fmt::Write;

use heapless::String;
use statglow_display::{DisplayError, Region, RenderSurface, PANEL_WIDTH};

use super::Widget;
use crate::config::TemperatureConfig;
use crate::interpolate::truncate;
use crate::ramp::{BACKGROUND, HIGHLIGHT};

const LINE_HEIGHT: u16 = 10;

pub struct TemperatureWidget {
    x: u16,
    y: u16,
    celsius: i64,
    shown: Option<i64>,
}

impl TemperatureWidget {
    pub fn new(config: &TemperatureConfig) -> Self {
        Self {
            x: config.x,
            y: config.y,
            celsius: 0,
            shown: None,
        }
    }

    /// Record a new reading
    ///
    /// NaN reads as 0 and values beyond the integer range saturate.
    pub fn set_temperature(&mut self, celsius: f32) {
        self.celsius = truncate(celsius);
    }

    /// Whole degrees to display
    pub fn celsius(&self) -> i64 {
        self.celsius
    }
}

impl Widget for TemperatureWidget {
    fn advance(&mut self, _now_ms: u64) -> bool {
        if self.shown == Some(self.celsius) {
            return false;
        }
        self.shown = Some(self.celsius);
        true
    }

    fn render<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        let (width, _) = surface.pixel_dimensions();
        let row = Region::new(
            self.x,
            self.y + LINE_HEIGHT,
            width.saturating_sub(self.x),
            surface.line_height(),
        );
        surface.fill_region(row, BACKGROUND)?;

        let mut line: String<32> = String::new();
        write!(line, "CPU: {} c*", self.celsius).ok();
        surface.draw_text(row.x, row.y, &line, HIGHLIGHT)
    }

    fn draw_static<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        surface.draw_text(self.x, self.y, "Temperature", HIGHLIGHT)
    }

    fn bounds(&self) -> Region {
        Region::new(
            self.x,
            self.y,
            (PANEL_WIDTH as u16).saturating_sub(self.x),
            2 * LINE_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSurface;

    #[test]
    fn test_redraws_only_on_whole_degree_change() {
        let mut widget = TemperatureWidget::new(&TemperatureConfig::default());
        let mut surface = RecordingSurface::new();

        assert!(widget.advance(0));
        widget.render(&mut surface).unwrap();
        assert_eq!(surface.texts(), ["CPU: 0 c*"]);

        widget.set_temperature(0.9);
        assert!(!widget.advance(1));

        widget.set_temperature(54.7);
        assert!(widget.advance(2));
        surface.clear();
        widget.render(&mut surface).unwrap();
        assert_eq!(surface.texts(), ["CPU: 54 c*"]);
        assert_eq!(surface.fills()[0].0, Region::new(141, 55, 99, 10));
    }

    #[test]
    fn test_odd_readings() {
        let mut widget = TemperatureWidget::new(&TemperatureConfig::default());
        widget.set_temperature(f32::NAN);
        assert_eq!(widget.celsius(), 0);
        widget.set_temperature(-3.5);
        assert_eq!(widget.celsius(), -3);
    }
}
