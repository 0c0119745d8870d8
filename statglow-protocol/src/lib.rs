//! Host Telemetry Link Protocol
//!
//! This crate defines the one-way serial protocol between the host computer
//! (the metrics producer) and the statglow panel. The protocol is designed for
//! simplicity: the host streams fixed-size binary records with no framing.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────┬─────┬─────┬──────┬────────┬─────────┬─────────────┐
//! │ CPU │ GPU │ MEM │ DISK │ NET_IN │ NET_OUT │ TEMPERATURE │
//! │ i8  │ i8  │ i8  │ i8   │ u32 LE │ u32 LE  │ f32 LE      │
//! └─────┴─────┴─────┴──────┴────────┴─────────┴─────────────┘
//! ```
//!
//! There is no start byte, length or checksum. The panel relies on the host
//! never tearing a record across writes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod record;

pub use decoder::{DecodeError, DecodeState, RecordDecoder, Records, DECODER_CAPACITY};
pub use record::{TelemetryRecord, RECORD_LEN};
