//! Rendering primitives for statglow
//!
//! This crate provides:
//! - `RenderSurface` trait that widgets draw through
//! - `PanelSink` trait that panel drivers implement
//! - `Framebuffer`, an indexed off-screen buffer with dirty tracking
//! - `BufferedSurface`, which ties the two together
//! - `Palette`/`PaletteIndex` and `Bitmap` for colour ramps
//! - `St7789`, the SPI panel driver used on the device
//!
//! # Architecture
//!
//! ```text
//!   widgets ──► RenderSurface ──► Framebuffer (1 byte/px)
//!                                      │ flush (dirty rect only)
//!                                      ▼
//!                               Palette lookup ──► PanelSink (RGB565)
//! ```
//!
//! Widgets never talk to the panel directly; the scheduler flushes once
//! per loop iteration after all widgets have drawn.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod bitmap;
pub mod color;
pub mod framebuffer;
pub mod region;
pub mod st7789;
pub mod surface;

// Re-export key types
pub use backend::{DisplayError, PanelSink, RenderSurface};
pub use bitmap::Bitmap;
pub use color::{Palette, PaletteIndex, PALETTE_SIZE};
pub use framebuffer::{
    Framebuffer, PanelFramebuffer, MAX_DIRTY_REGIONS, PANEL_HEIGHT, PANEL_WIDTH, TEXT_FONT,
};
pub use region::Region;
pub use st7789::St7789;
pub use surface::BufferedSurface;
