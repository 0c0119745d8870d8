//! ST7789 TFT Display Driver
//!
//! Driver for the 240x135 ST7789 IPS module over a write-only SPI bus with
//! separate chip-select and data/command lines. Pixels are sent as
//! big-endian RGB565.
//!
//! The visible window sits inside the controller's 320x240 RAM, so every
//! address is shifted by the configured column/row offsets.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RawData;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::backend::{DisplayError, PanelSink};
use crate::region::Region;

/// ST7789 commands
mod cmd {
    pub const SOFT_RESET: u8 = 0x01;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const NORMAL_MODE: u8 = 0x13;
    pub const INVERT_ON: u8 = 0x21;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDR: u8 = 0x2A;
    pub const ROW_ADDR: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const MEMORY_ACCESS: u8 = 0x36;
    pub const PIXEL_FORMAT: u8 = 0x3A;
}

/// MADCTL bits
mod madctl {
    pub const ROW_ORDER: u8 = 0x80;
    pub const SWAP_XY: u8 = 0x20;
}

/// Landscape with the connector on the right
const MADCTL_LANDSCAPE: u8 = madctl::SWAP_XY | madctl::ROW_ORDER;

/// 16 bits per pixel, 65k colours
const COLMOD_RGB565: u8 = 0x55;

/// Pixels converted per SPI write
const CHUNK_PIXELS: usize = 64;

/// ST7789 SPI driver
pub struct St7789<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    col_offset: u16,
    row_offset: u16,
}

impl<SPI, DC, CS, RST> St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a new driver
    ///
    /// `col_offset`/`row_offset` locate visible (0, 0) in controller RAM.
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, col_offset: u16, row_offset: u16) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            col_offset,
            row_offset,
        }
    }

    /// Hardware reset and initialization sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(120);

        self.command(cmd::SOFT_RESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLEEP_OUT, &[])?;
        delay.delay_ms(10);

        self.command(cmd::PIXEL_FORMAT, &[COLMOD_RGB565])?;
        self.command(cmd::MEMORY_ACCESS, &[MADCTL_LANDSCAPE])?;
        // IPS panels need inversion for correct colours
        self.command(cmd::INVERT_ON, &[])?;
        self.command(cmd::NORMAL_MODE, &[])?;
        delay.delay_ms(10);
        self.command(cmd::DISPLAY_ON, &[])?;
        delay.delay_ms(10);

        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        let result = self.command_selected(command, params);
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        result
    }

    fn command_selected(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.spi.write(params).map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    /// Set the RAM window for the following memory write
    fn set_window(&mut self, region: Region) -> Result<(), DisplayError> {
        let x0 = region.x + self.col_offset;
        let x1 = region.right() - 1 + self.col_offset;
        let y0 = region.y + self.row_offset;
        let y1 = region.bottom() - 1 + self.row_offset;

        self.command(cmd::COLUMN_ADDR, &address_range(x0, x1))?;
        self.command(cmd::ROW_ADDR, &address_range(y0, y1))
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&[cmd::MEMORY_WRITE])
            .map_err(|_| DisplayError::Communication)?;
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;

        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;
        for pixel in pixels {
            let raw = RawU16::from(pixel).into_inner();
            chunk[len..len + 2].copy_from_slice(&raw.to_be_bytes());
            len += 2;
            if len == chunk.len() {
                self.spi.write(&chunk).map_err(|_| DisplayError::Communication)?;
                len = 0;
            }
        }
        if len > 0 {
            self.spi
                .write(&chunk[..len])
                .map_err(|_| DisplayError::Communication)?;
        }
        self.spi.flush().map_err(|_| DisplayError::Communication)
    }
}

impl<SPI, DC, CS, RST> PanelSink for St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    fn write_region<I>(&mut self, region: Region, pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        if region.is_empty() {
            return Ok(());
        }
        self.set_window(region)?;

        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        let result = self.write_pixels(pixels);
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        result
    }
}

/// Start/end address parameters for CASET/RASET
fn address_range(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_graphics::prelude::RgbColor;

    /// Bus traffic as (is_data, bytes)
    type Log = Rc<RefCell<Vec<(bool, Vec<u8>)>>>;

    /// Mock SPI bus that records writes tagged with the DC level
    struct MockSpi {
        log: Log,
        dc: Rc<RefCell<bool>>,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            let is_data = *self.dc.borrow();
            let mut log = self.log.borrow_mut();
            match log.last_mut() {
                Some((data, bytes)) if *data && is_data => bytes.extend_from_slice(words),
                _ => log.push((is_data, words.to_vec())),
            }
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Mock GPIO pin sharing its level with the bus mock
    struct MockPin {
        level: Rc<RefCell<bool>>,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            *self.level.borrow_mut() = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            *self.level.borrow_mut() = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn driver() -> (St7789<MockSpi, MockPin, MockPin, MockPin>, Log, Rc<RefCell<bool>>) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let dc = Rc::new(RefCell::new(false));
        let cs = Rc::new(RefCell::new(true));
        let spi = MockSpi {
            log: log.clone(),
            dc: dc.clone(),
        };
        let display = St7789::new(
            spi,
            MockPin { level: dc },
            MockPin { level: cs.clone() },
            MockPin {
                level: Rc::new(RefCell::new(true)),
            },
            40,
            53,
        );
        (display, log, cs)
    }

    #[test]
    fn test_init_sequence() {
        let (mut display, log, cs) = driver();
        display.init(&mut NoDelay).unwrap();

        let commands: Vec<u8> = log
            .borrow()
            .iter()
            .filter(|(data, _)| !data)
            .map(|(_, bytes)| bytes[0])
            .collect();
        assert_eq!(
            commands,
            [
                cmd::SOFT_RESET,
                cmd::SLEEP_OUT,
                cmd::PIXEL_FORMAT,
                cmd::MEMORY_ACCESS,
                cmd::INVERT_ON,
                cmd::NORMAL_MODE,
                cmd::DISPLAY_ON,
            ]
        );
        assert!(log.borrow().contains(&(true, vec![COLMOD_RGB565])));
        assert!(log.borrow().contains(&(true, vec![0xA0])));
        assert!(*cs.borrow());
    }

    #[test]
    fn test_write_region_applies_offsets() {
        let (mut display, log, cs) = driver();
        let region = Region::new(0, 0, 2, 1);
        display
            .write_region(region, [Rgb565::RED, Rgb565::WHITE])
            .unwrap();

        let log = log.borrow();
        assert_eq!(log[0], (false, vec![cmd::COLUMN_ADDR]));
        assert_eq!(log[1], (true, vec![0, 40, 0, 41]));
        assert_eq!(log[2], (false, vec![cmd::ROW_ADDR]));
        assert_eq!(log[3], (true, vec![0, 53, 0, 53]));
        assert_eq!(log[4], (false, vec![cmd::MEMORY_WRITE]));
        assert_eq!(log[5], (true, vec![0xF8, 0x00, 0xFF, 0xFF]));
        assert!(*cs.borrow());
    }

    #[test]
    fn test_long_runs_are_chunked() {
        let (mut display, log, _) = driver();
        let region = Region::new(10, 10, 100, 1);
        display
            .write_region(region, core::iter::repeat(Rgb565::BLACK).take(100))
            .unwrap();

        assert_eq!(log.borrow()[5].1.len(), 200);
    }

    #[test]
    fn test_empty_region_sends_nothing() {
        let (mut display, log, _) = driver();
        display
            .write_region(Region::default(), core::iter::empty())
            .unwrap();
        assert!(log.borrow().is_empty());
    }
}
