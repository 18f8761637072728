//! Rotary Encoder Input
//!
//! Quadrature decoding of the two encoder lines and the lock-free delta
//! shared between the edge handler and the foreground loop.

use core::sync::atomic::{AtomicI32, Ordering};

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (increment)
    Clockwise,
    /// Counter-clockwise rotation (decrement)
    CounterClockwise,
}

impl Direction {
    /// Signed unit step for this direction
    #[must_use]
    pub const fn as_delta(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Progress through one detent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Phase {
    /// Both contacts open
    #[default]
    Rest,
    /// First contact closed, direction decided
    Entered(Direction),
    /// Both contacts closed
    Overlap(Direction),
    /// First contact reopened, waiting for the second
    Leaving(Direction),
}

/// Full-sequence decoder for the tuning knob
///
/// Levels are contact states (`true` = closed). The knob's lines idle high
/// through the pull-ups and a closed contact pulls them low, so the edge task
/// feeds `is_low()` for both lines and the decoder rests at open/open between
/// detents.
///
/// Clockwise closes A after B (`01 -> 11 -> 10 -> 00`), counter-clockwise
/// the mirror. A step is reported only when the last contact reopens, so
/// chatter on a single contact falls back to rest without moving
/// the dial.
#[derive(Clone, Debug)]
pub struct QuadratureDecoder {
    phase: Phase,
    contacts: (bool, bool),
}

impl QuadratureDecoder {
    /// Create a decoder with both contacts open
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Rest,
            contacts: (false, false),
        }
    }

    /// Feed the contact states after an edge; returns the direction once a
    /// detent completes
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        use Direction::{Clockwise, CounterClockwise};

        if self.contacts == (a, b) {
            return None;
        }
        self.contacts = (a, b);

        let (phase, step) = match (self.phase, a, b) {
            (Phase::Rest, false, true) => (Phase::Entered(Clockwise), None),
            (Phase::Rest, true, false) => (Phase::Entered(CounterClockwise), None),
            (Phase::Entered(dir), true, true) => (Phase::Overlap(dir), None),
            (Phase::Overlap(Clockwise), true, false) => (Phase::Leaving(Clockwise), None),
            (Phase::Overlap(CounterClockwise), false, true) => {
                (Phase::Leaving(CounterClockwise), None)
            }
            (Phase::Leaving(dir), false, false) => (Phase::Rest, Some(dir)),
            _ => (Phase::Rest, None),
        };

        self.phase = phase;
        step
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Detent count accumulated by the edge handler
///
/// Single producer (edge handler), single consumer (foreground loop).
/// The consumer reads and clears in one atomic swap.
#[derive(Debug)]
pub struct EncoderDelta {
    count: AtomicI32,
}

impl EncoderDelta {
    /// Create an empty delta
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
        }
    }

    /// Record one detent; called from the edge handler
    pub fn record(&self, direction: Direction) {
        self.count.fetch_add(direction.as_delta(), Ordering::Relaxed);
    }

    /// Take the accumulated count and reset it to zero
    pub fn drain(&self) -> i32 {
        self.count.swap(0, Ordering::Relaxed)
    }

    /// Peek at the accumulated count without consuming it
    #[must_use]
    pub fn pending(&self) -> i32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for EncoderDelta {
    fn default() -> Self {
        Self::new()
    }
}

/// Delta shared with the encoder edge handler on the board
pub static ENCODER_DELTA: EncoderDelta = EncoderDelta::new();
