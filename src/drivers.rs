//! Peripheral Drivers
//!
//! Drivers for the external ICs: the Si4735 tuner and the OLED panel.
//! Both are written against `embedded-hal` / `embedded-graphics` traits.

pub mod display;
pub mod si4735;
