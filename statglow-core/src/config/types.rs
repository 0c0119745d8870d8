//! Configuration type definitions
//!
//! These types describe the panel layout and timing. They are filled from
//! the `panel.toml` embedded in the firmware image at build time.

use heapless::String;
use statglow_hal::UartConfig;

use crate::ramp::RampOrientation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum gauge caption length
pub const MAX_CAPTION_LEN: usize = 8;

/// Number of load gauges (cpu, gpu, mem, disk)
pub const GAUGE_COUNT: usize = 4;

/// One load gauge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaugeConfig {
    /// Label drawn under the bar
    pub caption: String<MAX_CAPTION_LEN>,
    /// Left edge of the bar
    pub x: u16,
    /// Top edge of the bar
    pub y: u16,
    /// Glide duration in milliseconds
    pub glide_ms: u32,
}

impl GaugeConfig {
    /// Gauge at (`x`, `y`) with a caption
    ///
    /// Captions longer than [`MAX_CAPTION_LEN`] are cut short.
    pub fn new(caption: &str, x: u16, y: u16, glide_ms: u32) -> Self {
        let mut label = String::new();
        for c in caption.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self {
            caption: label,
            x,
            y,
            glide_ms,
        }
    }
}

/// Network throughput readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkConfig {
    /// Left edge of the block
    pub x: u16,
    /// Top edge of the block
    pub y: u16,
    /// Glide duration in milliseconds
    pub glide_ms: u32,
    /// Update on every Nth scheduler iteration
    pub decimation: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            x: 141,
            y: 5,
            glide_ms: 1000,
            decimation: 4,
        }
    }
}

/// Temperature readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemperatureConfig {
    /// Left edge of the block
    pub x: u16,
    /// Top edge of the block
    pub y: u16,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self { x: 141, y: 45 }
    }
}

/// Host serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Baud rate
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

impl SerialConfig {
    /// UART settings for this link (8N1)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }
}

/// Panel hardware and colour settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Gradient direction inside the bars
    pub orientation: RampOrientation,
    /// Controller column of visible x = 0
    pub col_offset: u16,
    /// Controller row of visible y = 0
    pub row_offset: u16,
    /// SPI clock in Hz
    pub spi_frequency_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            orientation: RampOrientation::HotTop,
            col_offset: 40,
            row_offset: 53,
            spi_frequency_hz: 62_500_000,
        }
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Gauges in record order (cpu, gpu, mem, disk)
    pub gauges: [GaugeConfig; GAUGE_COUNT],
    pub network: NetworkConfig,
    pub temperature: TemperatureConfig,
    pub serial: SerialConfig,
    pub display: DisplayConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            gauges: [
                GaugeConfig::new("CPU", 0, 0, 1000),
                GaugeConfig::new("GPU", 35, 0, 1000),
                GaugeConfig::new("MEM", 70, 0, 1),
                GaugeConfig::new("SSD", 105, 0, 1),
            ],
            network: NetworkConfig::default(),
            temperature: TemperatureConfig::default(),
            serial: SerialConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
