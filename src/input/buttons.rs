//! Push Button Scanning
//!
//! Buttons are sampled, not interrupt driven. A scan pass runs at most once
//! per [`BUTTON_SCAN_INTERVAL_MS`]; a button held across several passes
//! fires once per pass.

use embedded_hal::digital::InputPin;

use super::IntervalGate;
use crate::config::BUTTON_SCAN_INTERVAL_MS;

/// Number of button lines
pub const BUTTON_COUNT: usize = 9;

/// Front panel buttons, in scan priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Next band
    BandUp,
    /// Previous band
    BandDown,
    /// Cycle AM -> LSB -> USB -> AM
    Mode,
    /// Cycle the filter bandwidth
    Bandwidth,
    /// Cycle the tuning step (stereo toggle in FM, BFO step with BFO on)
    Step,
    /// Toggle BFO adjustment (seek up in FM)
    Bfo,
    /// Toggle the AGC
    Agc,
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
}

impl Button {
    /// All buttons in scan priority order; index matches the pin array of
    /// [`ButtonPanel`]
    pub const ALL: [Self; BUTTON_COUNT] = [
        Self::BandUp,
        Self::BandDown,
        Self::Mode,
        Self::Bandwidth,
        Self::Step,
        Self::Bfo,
        Self::Agc,
        Self::VolumeUp,
        Self::VolumeDown,
    ];
}

#[cfg(feature = "embedded")]
impl defmt::Format for Button {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::BandUp => defmt::write!(f, "BandUp"),
            Self::BandDown => defmt::write!(f, "BandDown"),
            Self::Mode => defmt::write!(f, "Mode"),
            Self::Bandwidth => defmt::write!(f, "Bandwidth"),
            Self::Step => defmt::write!(f, "Step"),
            Self::Bfo => defmt::write!(f, "BFO"),
            Self::Agc => defmt::write!(f, "AGC"),
            Self::VolumeUp => defmt::write!(f, "Vol+"),
            Self::VolumeDown => defmt::write!(f, "Vol-"),
        }
    }
}

/// Active-low button lines with a time-gated scan
pub struct ButtonPanel<P> {
    pins: [P; BUTTON_COUNT],
    gate: IntervalGate,
}

impl<P: InputPin> ButtonPanel<P> {
    /// Create a panel; `pins` are ordered like [`Button::ALL`] and must be
    /// configured with pull-ups
    #[must_use]
    pub const fn new(pins: [P; BUTTON_COUNT]) -> Self {
        Self {
            pins,
            gate: IntervalGate::new(BUTTON_SCAN_INTERVAL_MS),
        }
    }

    /// Run a scan pass if the gate interval elapsed
    ///
    /// Returns the first pressed button in priority order. A pin that
    /// fails to read counts as released.
    pub fn scan(&mut self, now_ms: u32) -> Option<Button> {
        if !self.gate.ready(now_ms) {
            return None;
        }

        self.pins
            .iter_mut()
            .zip(Button::ALL)
            .find_map(|(pin, button)| pin.is_low().unwrap_or(false).then_some(button))
    }
}
