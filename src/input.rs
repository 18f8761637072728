//! Input Sampling
//!
//! Turns encoder detents and button presses into [`InputEvent`]s for the
//! receiver state machine.

pub mod buttons;
pub mod encoder;

use embedded_hal::digital::InputPin;
use heapless::Vec;

use buttons::{Button, ButtonPanel};
use encoder::EncoderDelta;

/// Discrete input event fed to the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A button scan found this button pressed
    Press(Button),
    /// Net encoder detents since the last drain (positive is clockwise)
    Rotate(i32),
}

#[cfg(feature = "embedded")]
impl defmt::Format for InputEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Press(button) => defmt::write!(f, "Press({})", button),
            Self::Rotate(delta) => defmt::write!(f, "Rotate({})", delta),
        }
    }
}

/// Minimum-elapsed-time gate on a free running millisecond clock
#[derive(Clone, Copy, Debug)]
pub struct IntervalGate {
    interval_ms: u32,
    last_ms: u32,
}

impl IntervalGate {
    /// Create a gate that first opens `interval_ms` after time zero
    #[must_use]
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: 0,
        }
    }

    /// Check the gate; opening it restarts the interval from `now_ms`
    pub fn ready(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_ms) >= self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Gate interval
    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

/// Foreground half of the input path: drains the encoder, scans buttons
pub struct InputSampler<'a, P> {
    buttons: ButtonPanel<P>,
    encoder: &'a EncoderDelta,
}

impl<'a, P: InputPin> InputSampler<'a, P> {
    /// Create a sampler over a button panel and the shared encoder delta
    #[must_use]
    pub const fn new(buttons: ButtonPanel<P>, encoder: &'a EncoderDelta) -> Self {
        Self { buttons, encoder }
    }

    /// Collect the events of one loop pass: rotation first, then at most one
    /// button press
    pub fn poll(&mut self, now_ms: u32) -> Vec<InputEvent, 2> {
        let mut events = Vec::new();

        let delta = self.encoder.drain();
        if delta != 0 {
            let _ = events.push(InputEvent::Rotate(delta));
        }

        if let Some(button) = self.buttons.scan(now_ms) {
            let _ = events.push(InputEvent::Press(button));
        }

        events
    }
}
