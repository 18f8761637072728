//! SSB Receiver Firmware Library
//!
//! Core of a portable AM/FM/SSB broadcast and ham-band receiver built
//! around an Si4735 tuner, a 128x64 OLED, a rotary encoder and a row of
//! push buttons, running on an STM32G474.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Receiver State Machine  │  Band Table  │  SSB Patch Loader  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  INPUT / USER INTERFACE                      │
//! │  Encoder Delta  │  Button Scan  │  Differential Renderer     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                        DRIVERS                               │
//! │  Si4735 (Tuner trait)  │  Glyph Canvas (embedded-graphics)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single owner**: the control loop owns all receiver state; the only
//!   shared datum is the encoder's atomic delta
//! - **Trait seams**: the core talks to [`tuner::Tuner`] and
//!   [`ui::GlyphDisplay`], so it runs on the host against test doubles
//! - **Faults stop at the driver**: chip errors are logged and absorbed at
//!   the tuner boundary; the core has no error channel

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Peripheral Drivers
///
/// Si4735 tuner driver and the glyph display adapter.
pub mod drivers;

/// Input Sampling
///
/// Quadrature decoding, encoder delta and button scanning.
pub mod input;

/// Radio Control Logic
///
/// Band table, receiver state machine and SSB patch loading.
pub mod radio;

/// Tuner command interface
pub mod tuner;

/// User Interface
///
/// Status screen, field formatting and differential rendering.
pub mod ui;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::input::{InputEvent, InputSampler, IntervalGate};
    pub use crate::radio::ssb::SsbPatch;
    pub use crate::radio::state::ReceiverContext;
    pub use crate::tuner::Tuner;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};
    pub use embedded_hal::i2c::I2c;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
