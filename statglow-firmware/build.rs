//! Build script for statglow-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use statglow_core::config::parse_config;
use statglow_core::{ColorRamp, FrameScheduler};

/// Visible panel size in landscape
const PANEL_WIDTH: i64 = 240;
const PANEL_HEIGHT: i64 = 135;

/// Longest gauge caption the firmware accepts
const MAX_CAPTION_LEN: usize = 8;

const GAUGES: [&str; 4] = ["cpu", "gpu", "mem", "disk"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read panel.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in panel.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_serial(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_gauges(&config, &mut errors);
    validate_network(&config, &mut errors);
    validate_block(&config, "temperature", &["x", "y"], &mut errors);

    if !errors.is_empty() {
        fail("panel.toml validation failed", &errors);
    }

    validate_layout(&config_content);

    println!("cargo:warning=panel.toml validated successfully");
}

/// Parse with the firmware's own parser and reject overlapping widgets
fn validate_layout(content: &str) {
    let config = match parse_config(content) {
        Ok(config) => config,
        Err(e) => fail(
            "panel.toml rejected by the firmware parser",
            &[format!("{:?}", e)],
        ),
    };

    let ramp = ColorRamp::new(config.display.orientation);
    if let Err(e) = FrameScheduler::new(&ramp, &config) {
        fail(
            "panel.toml layout has overlapping widgets",
            &[
                format!("{} and {} both draw into", e.first, e.second),
                format!(
                    "x {}..{}, y {}..{}",
                    e.overlap.x,
                    e.overlap.right(),
                    e.overlap.y,
                    e.overlap.bottom()
                ),
            ],
        );
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.clone()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔════════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<58} ║\n\
        ╠════════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚════════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Only known top-level sections may appear
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("Top level must be a table".to_string());
        return;
    };
    for key in table.keys() {
        if !["serial", "display", "gauge", "network", "temperature"].contains(&key.as_str()) {
            errors.push(format!("Unknown section [{}]", key));
        }
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(serial) = config.get("serial") else {
        return;
    };
    check_keys("serial", serial, &["baudrate", "baud_rate"], errors);
    for key in ["baudrate", "baud_rate"] {
        check_int("serial", serial, key, 1200, 4_000_000, errors);
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };
    check_keys(
        "display",
        display,
        &["orientation", "col_offset", "row_offset", "spi_frequency_hz"],
        errors,
    );
    if let Some(orientation) = display.get("orientation") {
        match orientation.as_str() {
            Some("hot_top") | Some("hot_bottom") => {}
            _ => errors.push(
                "[display] orientation must be \"hot_top\" or \"hot_bottom\"".to_string(),
            ),
        }
    }
    check_int("display", display, "col_offset", 0, 320, errors);
    check_int("display", display, "row_offset", 0, 320, errors);
    check_int("display", display, "spi_frequency_hz", 1, 62_500_000, errors);
}

fn validate_gauges(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(gauges) = config.get("gauge") else {
        return;
    };
    let Some(table) = gauges.as_table() else {
        errors.push("[gauge] must contain [gauge.<name>] tables".to_string());
        return;
    };

    for (name, gauge) in table {
        if !GAUGES.contains(&name.as_str()) {
            errors.push(format!(
                "Unknown gauge [gauge.{}] (expected cpu, gpu, mem or disk)",
                name
            ));
            continue;
        }
        let section = format!("gauge.{}", name);
        check_keys(&section, gauge, &["caption", "x", "y", "glide_ms"], errors);
        check_position(&section, gauge, errors);
        check_int(&section, gauge, "glide_ms", 0, 60_000, errors);

        if let Some(caption) = gauge.get("caption") {
            match caption.as_str() {
                Some(text) if text.len() <= MAX_CAPTION_LEN => {}
                Some(_) => errors.push(format!(
                    "[{}] caption longer than {} characters",
                    section, MAX_CAPTION_LEN
                )),
                None => errors.push(format!("[{}] caption must be a string", section)),
            }
        }
    }
}

fn validate_network(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(network) = config.get("network") else {
        return;
    };
    check_keys("network", network, &["x", "y", "glide_ms", "decimation"], errors);
    check_position("network", network, errors);
    check_int("network", network, "glide_ms", 0, 60_000, errors);
    check_int("network", network, "decimation", 1, 255, errors);
}

/// A block with only position keys
fn validate_block(config: &toml::Value, name: &str, keys: &[&str], errors: &mut Vec<String>) {
    let Some(block) = config.get(name) else {
        return;
    };
    check_keys(name, block, keys, errors);
    check_position(name, block, errors);
}

fn check_keys(section: &str, value: &toml::Value, allowed: &[&str], errors: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        errors.push(format!("[{}] must be a table", section));
        return;
    };
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn check_position(section: &str, value: &toml::Value, errors: &mut Vec<String>) {
    check_int(section, value, "x", 0, PANEL_WIDTH - 1, errors);
    check_int(section, value, "y", 0, PANEL_HEIGHT - 1, errors);
}

fn check_int(
    section: &str,
    value: &toml::Value,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    let Some(field) = value.get(key) else {
        return;
    };
    match field.as_integer() {
        Some(n) if (min..=max).contains(&n) => {}
        Some(n) => errors.push(format!(
            "[{}] {} = {} out of range {}..={}",
            section, key, n, min, max
        )),
        None => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}
