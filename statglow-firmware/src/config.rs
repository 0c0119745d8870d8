//! Configuration loading
//!
//! `panel.toml` is compiled into the image and parsed once at boot. The
//! build script has already validated it, so a parse failure here means a
//! parser/validator mismatch; the panel still comes up with defaults.

use defmt::*;
use statglow_core::config::{parse_config, PanelConfig};

/// Embedded configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> PanelConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: network decimation={}, baud={}",
                config.network.decimation, config.serial.baudrate
            );
            config
        }
        Err(e) => {
            error!("Failed to parse panel.toml: {:?}, using defaults", e);
            PanelConfig::default()
        }
    }
}
