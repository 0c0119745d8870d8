//! Board-agnostic core logic for the statglow telemetry panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Time-based interpolation of displayed values
//! - The heat-map colour ramp and its gradient bitmap
//! - Widgets (load gauges, network throughput, temperature)
//! - The per-iteration frame scheduler
//! - Panel configuration types and the `panel.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod format;
pub mod interpolate;
pub mod ramp;
pub mod scheduler;
pub mod widgets;

#[cfg(test)]
pub(crate) mod mock;

pub use interpolate::{interpolate, Glide};
pub use ramp::{ColorRamp, RampOrientation};
pub use scheduler::{FrameScheduler, TickReport};
pub use widgets::LayoutError;
