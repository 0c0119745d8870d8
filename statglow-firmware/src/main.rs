//! statglow - Host Telemetry Panel Firmware
//!
//! Firmware for an RP2040 driving a 240x135 ST7789 TFT. The host streams
//! fixed-size telemetry records over UART0; the panel shows four load
//! gauges, network throughput and CPU temperature.
//!
//! Wiring:
//!
//! ```text
//!   GP0  UART0 TX (unused)     GP16 TFT DC
//!   GP1  UART0 RX  ◄── host    GP17 TFT CS
//!   GP18 SPI0 SCK              GP20 TFT RST
//!   GP19 SPI0 MOSI             GP22 TFT backlight
//! ```

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::{Delay, Instant};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use statglow_core::config::PanelConfig;
use statglow_core::ramp::{ColorRamp, BACKGROUND};
use statglow_core::{FrameScheduler, TickReport};
use statglow_display::{BufferedSurface, PanelFramebuffer, St7789};

mod config;
mod serial;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Built in place; too large for the stack
static FRAMEBUFFER: ConstStaticCell<PanelFramebuffer> =
    ConstStaticCell::new(PanelFramebuffer::new(BACKGROUND));

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("statglow firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Backlight stays on for the life of the firmware
    let _backlight = Output::new(p.PIN_22, Level::High);

    // Setup SPI0 for the TFT (write-only)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = config.display.spi_frequency_hz;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let dc = Output::new(p.PIN_16, Level::Low);
    let cs = Output::new(p.PIN_17, Level::High);
    let rst = Output::new(p.PIN_20, Level::High);

    let mut panel = St7789::new(
        spi,
        dc,
        cs,
        rst,
        config.display.col_offset,
        config.display.row_offset,
    );
    match panel.init(&mut Delay) {
        Ok(()) => info!("ST7789 initialized"),
        Err(e) => error!("ST7789 init failed: {:?}", e),
    }

    // Setup UART0 for the host link
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart_config = serial::embassy_config(&config.serial.uart_config());
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    let mut link = serial::HostLink::new(rx);

    info!("UART initialized at {} baud", config.serial.baudrate);

    let ramp = ColorRamp::new(config.display.orientation);
    let mut surface = BufferedSurface::new(FRAMEBUFFER.take(), ramp.palette().clone(), panel);
    // build.rs runs the same overlap check
    let mut scheduler = match FrameScheduler::new(&ramp, &config) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!(
                "Widgets {} and {} overlap at {:?}, using default layout",
                e.first, e.second, e.overlap
            );
            FrameScheduler::new(&ramp, &PanelConfig::default()).unwrap()
        }
    };

    if let Err(e) = scheduler.draw_static(&mut surface) {
        warn!("Static layout draw failed: {:?}", e);
    }

    info!("Display loop running");

    loop {
        let report = scheduler.tick(&mut link, &mut surface, Instant::now().as_millis());
        log_report(&report);
        embassy_futures::yield_now().await;
    }
}

/// Log whatever the scheduler swallowed this iteration
fn log_report(report: &TickReport) {
    if report.records > 0 {
        trace!("Applied {} record(s)", report.records);
    }
    if report.serial_error {
        warn!("UART read error, continuing");
    }
    if report.render_errors > 0 {
        warn!("{} widget render(s) failed", report.render_errors);
    }
    if let Some(e) = report.flush_error {
        warn!("Panel flush failed: {:?}", e);
    }
}
