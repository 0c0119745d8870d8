//! Vertical load gauge
//!
//! ```text
//!   x         x+27
//!   ┌─────────┐ y            frame (white)
//!   │░░░░░░░░░│              mask (black), shrinks as load rises
//!   │▓▓▓▓▓▓▓▓▓│ ◄─ load
//!   │▓▓▓▓▓▓▓▓▓│              gradient
//!   └─────────┘ y+113
//!       42%     y+114        load caption
//!       CPU     y+124        fixed caption
//! ```

use core::fmt::Write;

use heapless::String;
use statglow_display::{DisplayError, Region, RenderSurface};

use super::Widget;
use crate::config::{GaugeConfig, MAX_CAPTION_LEN};
use crate::interpolate::{truncate, Glide};
use crate::ramp::{ColorRamp, BACKGROUND, BAR_HEIGHT, BAR_WIDTH, FRAME, GRADIENT_HEIGHT, HIGHLIGHT};

/// Offset of the load caption below the bar top
pub const LOAD_CAPTION_Y: u16 = BAR_HEIGHT + 1;

/// Offset of the fixed caption below the bar top
pub const CAPTION_Y: u16 = LOAD_CAPTION_Y + 10;

/// Load range shown by a gauge
const MIN_LOAD: f32 = 0.0;
const MAX_LOAD: f32 = 100.0;

/// Gradient rows hidden at a given load
pub fn mask_rows(load: f32) -> u16 {
    let hidden = GRADIENT_HEIGHT as f32 * (MAX_LOAD - load) / MAX_LOAD;
    (hidden as u16).min(GRADIENT_HEIGHT as u16)
}

/// One load bar with its captions
pub struct Gauge<'r> {
    ramp: &'r ColorRamp,
    caption: String<MAX_CAPTION_LEN>,
    x: u16,
    y: u16,
    load: Glide,
}

impl<'r> Gauge<'r> {
    /// Create a gauge from its layout
    ///
    /// It starts one point off its zero target so the first iteration
    /// draws the empty bar.
    pub fn new(ramp: &'r ColorRamp, config: &GaugeConfig) -> Self {
        Self {
            ramp,
            caption: config.caption.clone(),
            x: config.x,
            y: config.y,
            load: Glide::new(MIN_LOAD, config.glide_ms, MIN_LOAD, MAX_LOAD).with_current(1.0),
        }
    }

    /// Set a new target load in percent, clamped to 0..=100
    pub fn set_load(&mut self, percent: f32, now_ms: u64) {
        self.load.retarget(percent, now_ms);
    }

    /// Displayed load
    pub fn current(&self) -> f32 {
        self.load.current()
    }

    /// Load being approached
    pub fn target(&self) -> f32 {
        self.load.target()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    fn bar(&self) -> Region {
        Region::new(self.x, self.y, BAR_WIDTH, BAR_HEIGHT)
    }

    fn draw_centered<S: RenderSurface>(
        &self,
        surface: &mut S,
        offset_y: u16,
        text: &str,
    ) -> Result<(), DisplayError> {
        let line = Region::new(self.x, self.y + offset_y, BAR_WIDTH, surface.line_height());
        surface.fill_region(line, BACKGROUND)?;
        let text_x = self.x + BAR_WIDTH.saturating_sub(surface.text_width(text)) / 2;
        surface.draw_text(text_x, line.y, text, HIGHLIGHT)
    }
}

impl Widget for Gauge<'_> {
    fn advance(&mut self, now_ms: u64) -> bool {
        self.load.advance(now_ms)
    }

    fn render<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        surface.fill_region(self.bar(), FRAME)?;
        surface.blit(self.x + 1, self.y + 1, self.ramp.gradient())?;

        let hidden = mask_rows(self.load.current());
        let mask = Region::from_corners(
            self.x + 1,
            self.y + 1,
            self.x + BAR_WIDTH - 1,
            self.y + 1 + hidden,
        );
        if !mask.is_empty() {
            surface.fill_region(mask, BACKGROUND)?;
        }

        let mut text: String<8> = String::new();
        write!(text, "{}%", truncate(self.load.current())).ok();
        self.draw_centered(surface, LOAD_CAPTION_Y, &text)
    }

    fn draw_static<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        self.draw_centered(surface, CAPTION_Y, &self.caption)
    }

    fn bounds(&self) -> Region {
        Region::new(self.x, self.y, BAR_WIDTH, CAPTION_Y + 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Op, RecordingSurface};
    use crate::ramp::RampOrientation;
    use embedded_graphics::pixelcolor::Rgb565;
    use statglow_display::{BufferedSurface, Framebuffer, PaletteIndex, PanelSink};

    fn gauge(ramp: &ColorRamp, glide_ms: u32) -> Gauge<'_> {
        Gauge::new(ramp, &GaugeConfig::new("CPU", 35, 0, glide_ms))
    }

    struct Discard;

    impl PanelSink for Discard {
        fn write_region<I>(&mut self, _region: Region, _pixels: I) -> Result<(), DisplayError>
        where
            I: IntoIterator<Item = Rgb565>,
        {
            Ok(())
        }
    }

    type TestFb = Framebuffer<64, 135>;

    /// Render a settled gauge at `load` into a real framebuffer
    fn rendered(orientation: RampOrientation, load: f32) -> TestFb {
        let ramp = ColorRamp::new(orientation);
        let mut g = gauge(&ramp, 1);
        g.set_load(load, 0);
        assert!(g.advance(5));

        let mut fb = TestFb::new(BACKGROUND);
        {
            let mut surface = BufferedSurface::new(&mut fb, ramp.palette().clone(), Discard);
            g.render(&mut surface).unwrap();
        }
        fb
    }

    /// Palette indices of one bar row, inside the frame
    fn interior_row(fb: &TestFb, y: u16) -> std::vec::Vec<PaletteIndex> {
        (36..61).map(|x| fb.pixel(x, y).unwrap()).collect()
    }

    #[test]
    fn test_set_load_clamps() {
        let ramp = ColorRamp::default();
        let mut g = gauge(&ramp, 1000);

        g.set_load(150.0, 0);
        assert_eq!(g.target(), 100.0);
        g.set_load(-10.0, 0);
        assert_eq!(g.target(), 0.0);
    }

    #[test]
    fn test_first_advance_draws_empty_bar() {
        let ramp = ColorRamp::default();
        let mut g = gauge(&ramp, 1000);
        let mut surface = RecordingSurface::new();

        assert!(g.advance(0));
        assert_eq!(g.current(), 0.0);
        g.render(&mut surface).unwrap();

        assert_eq!(
            surface.ops[0],
            Op::Fill(Region::new(35, 0, 27, 113), FRAME)
        );
        assert_eq!(surface.ops[1], Op::Blit(36, 1, 25, 111));
        assert_eq!(
            surface.ops[2],
            Op::Fill(Region::new(36, 1, 25, 111), BACKGROUND)
        );
        assert_eq!(surface.texts(), ["0%"]);

        // Settled now
        assert!(!g.advance(10));
    }

    #[test]
    fn test_full_load_has_no_mask() {
        let ramp = ColorRamp::default();
        let mut g = gauge(&ramp, 1);
        let mut surface = RecordingSurface::new();

        g.set_load(100.0, 0);
        assert!(g.advance(5));
        g.render(&mut surface).unwrap();

        let background_fills: usize = surface
            .fills()
            .iter()
            .filter(|(region, color)| *color == BACKGROUND && region.y == 1)
            .count();
        assert_eq!(background_fills, 0);
        assert_eq!(surface.texts(), ["100%"]);
    }

    #[test]
    fn test_full_load_shows_red_at_top() {
        let fb = rendered(RampOrientation::HotTop, 100.0);

        assert!(interior_row(&fb, 1).iter().all(|&p| p == PaletteIndex(0)));
        assert!(interior_row(&fb, 111).iter().all(|&p| p == PaletteIndex(47)));
        for y in 0..113 {
            assert_eq!(fb.pixel(35, y), Some(FRAME));
            assert_eq!(fb.pixel(61, y), Some(FRAME));
        }
        assert_eq!(fb.pixel(40, 0), Some(FRAME));
        assert_eq!(fb.pixel(40, 112), Some(FRAME));
    }

    #[test]
    fn test_low_load_shows_only_green() {
        let fb = rendered(RampOrientation::HotTop, 10.0);

        // 111 * 90% = 99.9 rows hidden
        for y in 1..=99 {
            assert!(interior_row(&fb, y).iter().all(|&p| p == BACKGROUND), "row {y}");
        }
        for y in 100..=111 {
            let row = interior_row(&fb, y);
            assert!(row.iter().all(|&p| p.0 >= 42 && p.0 < 48), "row {y}: {row:?}");
        }
        assert_eq!(fb.pixel(35, 50), Some(FRAME));
    }

    #[test]
    fn test_hot_bottom_shows_red_at_low_load() {
        let fb = rendered(RampOrientation::HotBottom, 10.0);

        assert!(interior_row(&fb, 111).iter().all(|&p| p == PaletteIndex(0)));
        for y in 100..=111 {
            assert!(interior_row(&fb, y).iter().all(|&p| p.0 <= 4), "row {y}");
        }
        assert!(interior_row(&fb, 99).iter().all(|&p| p == BACKGROUND));
    }

    #[test]
    fn test_mask_rows() {
        assert_eq!(mask_rows(0.0), 111);
        assert_eq!(mask_rows(100.0), 0);
        assert_eq!(mask_rows(50.0), 55);
        assert_eq!(mask_rows(99.5), 0);
    }

    #[test]
    fn test_caption_centered() {
        let ramp = ColorRamp::default();
        let mut g = gauge(&ramp, 1);
        let mut surface = RecordingSurface::new();

        g.set_load(42.0, 0);
        g.advance(1);
        g.render(&mut surface).unwrap();
        // "42%" is 18px wide in a 27px bar
        assert!(surface
            .ops
            .contains(&Op::Text(35 + 4, LOAD_CAPTION_Y, "42%".into())));

        surface.clear();
        g.draw_static(&mut surface).unwrap();
        assert_eq!(
            surface.ops,
            [
                Op::Fill(Region::new(35, CAPTION_Y, 27, 10), BACKGROUND),
                Op::Text(35 + 4, CAPTION_Y, "CPU".into()),
            ]
        );
    }

    #[test]
    fn test_glide_midway() {
        let ramp = ColorRamp::default();
        let mut g = gauge(&ramp, 1000);

        g.advance(0);
        g.set_load(80.0, 1000);
        assert!(g.advance(1500));
        assert_eq!(g.current(), 40.0);
        assert!(g.advance(2000));
        assert_eq!(g.current(), 80.0);
        assert!(!g.advance(2100));
    }
}
