//! Minimal TOML parser for panel configuration
//!
//! Handles only the subset used by `panel.toml`. It does NOT support the
//! full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - [section.subsection] headers (gauges only)
//! - Comments (# ...), including trailing ones
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Floats, booleans and datetimes
//!
//! Keys that are not given keep their [`PanelConfig::default`] value.

use heapless::String;

use super::types::{PanelConfig, GAUGE_COUNT, MAX_CAPTION_LEN};
use crate::ramp::RampOrientation;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key for the current section
    InvalidKey,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// String longer than its field allows
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Display,
    Network,
    Temperature,
    Gauge(usize),
}

/// Gauge sub-section names in record order
const GAUGE_SLOTS: [&str; GAUGE_COUNT] = ["cpu", "gpu", "mem", "disk"];

/// Parse TOML configuration into a [`PanelConfig`]
pub fn parse_config(input: &str) -> Result<PanelConfig, ParseError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

/// Parse section header like "network" or "gauge.cpu"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some((kind, name)) = header.split_once('.') {
        if kind.trim() != "gauge" {
            return Err(ParseError::InvalidSection);
        }
        let name = name.trim();
        return GAUGE_SLOTS
            .iter()
            .position(|slot| *slot == name)
            .map(Section::Gauge)
            .ok_or(ParseError::InvalidSection);
    }

    match header {
        "serial" => Ok(Section::Serial),
        "display" => Ok(Section::Display),
        "network" => Ok(Section::Network),
        "temperature" => Ok(Section::Temperature),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Parse an integer value (underscores allowed as in TOML)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a gauge caption
fn parse_caption(value: &str) -> Result<String<MAX_CAPTION_LEN>, ParseError> {
    let text = parse_string(value)?;
    String::try_from(text).map_err(|_| ParseError::TooLong)
}

/// Parse ramp orientation
fn parse_orientation(value: &str) -> Result<RampOrientation, ParseError> {
    match parse_string(value)? {
        "hot_top" => Ok(RampOrientation::HotTop),
        "hot_bottom" => Ok(RampOrientation::HotBottom),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    config: &mut PanelConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Serial => match key {
            "baudrate" | "baud_rate" => config.serial.baudrate = parse_int(value)?,
            _ => return Err(ParseError::InvalidKey),
        },
        Section::Display => match key {
            "orientation" => config.display.orientation = parse_orientation(value)?,
            "col_offset" => config.display.col_offset = parse_int(value)?,
            "row_offset" => config.display.row_offset = parse_int(value)?,
            "spi_frequency_hz" => config.display.spi_frequency_hz = parse_int(value)?,
            _ => return Err(ParseError::InvalidKey),
        },
        Section::Network => match key {
            "x" => config.network.x = parse_int(value)?,
            "y" => config.network.y = parse_int(value)?,
            "glide_ms" => config.network.glide_ms = parse_int(value)?,
            "decimation" => {
                let decimation: u8 = parse_int(value)?;
                if decimation == 0 {
                    return Err(ParseError::InvalidValue);
                }
                config.network.decimation = decimation;
            }
            _ => return Err(ParseError::InvalidKey),
        },
        Section::Temperature => match key {
            "x" => config.temperature.x = parse_int(value)?,
            "y" => config.temperature.y = parse_int(value)?,
            _ => return Err(ParseError::InvalidKey),
        },
        Section::Gauge(slot) => {
            let gauge = &mut config.gauges[slot];
            match key {
                "caption" => gauge.caption = parse_caption(value)?,
                "x" => gauge.x = parse_int(value)?,
                "y" => gauge.y = parse_int(value)?,
                "glide_ms" => gauge.glide_ms = parse_int(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
        }
        Section::Root => return Err(ParseError::InvalidKey),
    }

    Ok(())
}
