//! Host serial link
//!
//! Wraps the interrupt-driven buffered UART so the scheduler can drain it
//! without ever awaiting.

use embassy_rp::uart::{self, BufferedUartRx};
use embedded_io::{Read, ReadReady};
use statglow_hal::uart::{DataBits, Parity, StopBits};
use statglow_hal::{UartConfig, UartRx};

/// Receive half of the host UART
pub struct HostLink {
    rx: BufferedUartRx,
}

impl HostLink {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl UartRx for HostLink {
    type Error = uart::Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.rx.read_ready()? {
            return Ok(0);
        }
        // Data is ready, so this returns without blocking
        self.rx.read(buf)
    }
}

/// Translate link settings into the embassy UART config
pub fn embassy_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}
