//! Statglow Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the render loop needs
//! from a chip-specific firmware. Keeping them here lets the loop and its
//! tests run on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  statglow-core (scheduler, widgets)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  statglow-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  statglow-firmware (RP2040 impls)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Non-blocking serial receive

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{UartConfig, UartRx};
