//! Frame scheduler
//!
//! Runs one iteration of the display loop:
//!
//! ```text
//!   UART ──► RecordDecoder ──► widget setters
//!                                   │
//!        gauges ◄── advance/render ─┤
//!        network (every Nth) ◄──────┤
//!        temperature ◄──────────────┘
//!                                   │
//!                              surface.flush()
//! ```
//!
//! Serial, render and flush failures never stop the loop; they are
//! collected in the returned [`TickReport`] for the caller to log.

use statglow_display::{DisplayError, Region, RenderSurface};
use statglow_hal::UartRx;
use statglow_protocol::{RecordDecoder, TelemetryRecord};

use crate::config::{PanelConfig, GAUGE_COUNT};
use crate::ramp::{ColorRamp, BACKGROUND};
use crate::widgets::{check_layout, Gauge, LayoutError, NetworkWidget, TemperatureWidget, Widget};

/// Bytes requested from the UART per read
const READ_CHUNK: usize = 64;

/// Widgets on the panel: four gauges, network, temperature
pub const WIDGET_COUNT: usize = GAUGE_COUNT + 2;

/// Gauge names in record order
const GAUGE_NAMES: [&str; GAUGE_COUNT] = ["cpu", "gpu", "mem", "disk"];

/// Outcome of one scheduler iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Records decoded and applied
    pub records: usize,
    /// The UART reported an error while draining
    pub serial_error: bool,
    /// Widgets that advanced and were redrawn
    pub widgets_rendered: u8,
    /// Widget renders that failed
    pub render_errors: u8,
    /// Flush failure, if any
    pub flush_error: Option<DisplayError>,
    /// The network widget was redrawn this iteration
    pub network_rendered: bool,
}

impl TickReport {
    /// True when nothing went wrong
    pub fn is_clean(&self) -> bool {
        !self.serial_error && self.render_errors == 0 && self.flush_error.is_none()
    }
}

/// Owns the widgets and the decoder and drives them each iteration
pub struct FrameScheduler<'r> {
    gauges: [Gauge<'r>; GAUGE_COUNT],
    network: NetworkWidget,
    temperature: TemperatureWidget,
    decoder: RecordDecoder,
    decimation: u8,
    iteration: u8,
}

impl<'r> FrameScheduler<'r> {
    /// Build all widgets from the panel configuration
    ///
    /// Fails when two widgets would draw over each other.
    pub fn new(ramp: &'r ColorRamp, config: &PanelConfig) -> Result<Self, LayoutError> {
        let scheduler = Self {
            gauges: core::array::from_fn(|i| Gauge::new(ramp, &config.gauges[i])),
            network: NetworkWidget::new(&config.network),
            temperature: TemperatureWidget::new(&config.temperature),
            decoder: RecordDecoder::new(),
            decimation: config.network.decimation.max(1),
            iteration: 0,
        };
        check_layout(&scheduler.layout())?;
        Ok(scheduler)
    }

    /// Every widget's rectangle, gauges first
    pub fn layout(&self) -> [(&'static str, Region); WIDGET_COUNT] {
        let mut areas = [("", Region::default()); WIDGET_COUNT];
        for (i, gauge) in self.gauges.iter().enumerate() {
            areas[i] = (GAUGE_NAMES[i], gauge.bounds());
        }
        areas[GAUGE_COUNT] = ("network", self.network.bounds());
        areas[GAUGE_COUNT + 1] = ("temperature", self.temperature.bounds());
        areas
    }

    /// Clear the panel and draw every widget's fixed parts
    pub fn draw_static<S: RenderSurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        let (width, height) = surface.pixel_dimensions();
        surface.fill_region(Region::new(0, 0, width, height), BACKGROUND)?;

        for gauge in &self.gauges {
            gauge.draw_static(surface)?;
        }
        self.network.draw_static(surface)?;
        self.temperature.draw_static(surface)?;
        surface.flush()
    }

    /// Hand one record to the widgets
    pub fn apply(&mut self, record: &TelemetryRecord, now_ms: u64) {
        for (gauge, load) in self.gauges.iter_mut().zip(record.loads()) {
            gauge.set_load(f32::from(load), now_ms);
        }
        self.network
            .set_rates(record.net_in_bps as f32, record.net_out_bps as f32, now_ms);
        self.temperature.set_temperature(record.temperature);
    }

    /// Run one iteration
    pub fn tick<R: UartRx, S: RenderSurface>(
        &mut self,
        rx: &mut R,
        surface: &mut S,
        now_ms: u64,
    ) -> TickReport {
        let mut report = TickReport::default();

        if self.drain(rx, now_ms, &mut report.records).is_err() {
            report.serial_error = true;
        }

        for gauge in &mut self.gauges {
            if gauge.advance(now_ms) {
                draw(&*gauge, surface, &mut report);
            }
        }

        if self.iteration % self.decimation == 0 && self.network.advance(now_ms) {
            draw(&self.network, surface, &mut report);
            report.network_rendered = true;
        }

        if self.temperature.advance(now_ms) {
            draw(&self.temperature, surface, &mut report);
        }

        if let Err(e) = surface.flush() {
            report.flush_error = Some(e);
        }

        self.iteration = self.iteration.wrapping_add(1);
        report
    }

    /// Read everything the UART has and apply each complete record
    ///
    /// Never asks the UART for more than the decoder can hold, so bytes
    /// stay in the UART buffer rather than being dropped.
    fn drain<R: UartRx>(
        &mut self,
        rx: &mut R,
        now_ms: u64,
        applied: &mut usize,
    ) -> Result<(), R::Error> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let room = self.decoder.spare_capacity().min(READ_CHUNK);
            if room == 0 {
                return Ok(());
            }

            let n = rx.read_available(&mut chunk[..room])?;
            if n == 0 {
                return Ok(());
            }

            self.decoder.push(&chunk[..n]);
            while let Some(record) = self.decoder.next_record() {
                self.apply(&record, now_ms);
                *applied += 1;
            }
        }
    }

    pub fn gauges(&self) -> &[Gauge<'r>; GAUGE_COUNT] {
        &self.gauges
    }

    pub fn network(&self) -> &NetworkWidget {
        &self.network
    }

    pub fn temperature(&self) -> &TemperatureWidget {
        &self.temperature
    }

    /// Bytes of a partial record waiting for the rest
    pub fn pending_bytes(&self) -> usize {
        self.decoder.pending()
    }

    /// Iteration counter (wraps at 256)
    pub fn iteration(&self) -> u8 {
        self.iteration
    }
}

fn draw<W: Widget, S: RenderSurface>(widget: &W, surface: &mut S, report: &mut TickReport) {
    report.widgets_rendered = report.widgets_rendered.saturating_add(1);
    if widget.render(surface).is_err() {
        report.render_errors = report.render_errors.saturating_add(1);
    }
}
