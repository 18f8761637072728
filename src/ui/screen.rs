//! Status screen layout
//!
//! ```text
//! +----------------------------+
//! |MODE STATUS                 |
//! |  FREQUENCY (large)    UNIT |
//! |BFO                         |
//! |VOLUME        RSSI          |
//! +----------------------------+
//! ```

use super::format::{
    bfo_text, frequency_text, mode_text, rssi_text, status_text, unit_text, volume_text,
    StatusInfo,
};
use super::render::Field;
use super::{GlyphColor, GlyphDisplay, GlyphSize};
use crate::types::{BandType, Mode};

/// Everything the status screen shows, snapshotted from the receiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenView {
    /// Type of the active band
    pub band_type: BandType,
    /// Operating mode
    pub mode: Mode,
    /// Working frequency in band units
    pub frequency: u16,
    /// BFO adjustment active
    pub bfo_enabled: bool,
    /// BFO offset in Hz
    pub bfo_offset: i16,
    /// BFO step in Hz
    pub bfo_step: i16,
    /// Volume as reported by the tuner
    pub volume: u8,
    /// Last RSSI reading
    pub rssi: u8,
    /// Status line inputs
    pub status: StatusInfo,
}

/// The receiver's status screen with one cached field per value
#[derive(Clone, Debug)]
pub struct StatusScreen {
    frequency: Field,
    mode: Field,
    unit: Field,
    status: Field,
    bfo: Field,
    volume: Field,
    rssi: Field,
}

impl StatusScreen {
    /// Create a screen with empty caches
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Field::new(0, 0, GlyphSize::Small),
            status: Field::new(24, 0, GlyphSize::Small),
            frequency: Field::new(4, 16, GlyphSize::Large),
            unit: Field::new(104, 24, GlyphSize::Small),
            bfo: Field::new(0, 40, GlyphSize::Small),
            volume: Field::new(0, 54, GlyphSize::Small),
            rssi: Field::new(64, 54, GlyphSize::Small),
        }
    }

    /// Clear the panel and forget every cached field
    pub fn reset<G: GlyphDisplay>(&mut self, display: &mut G) {
        display.clear();
        for field in self.fields_mut() {
            field.invalidate();
        }
    }

    /// Redraw what changed since the last refresh
    ///
    /// The frame is only pushed to the panel when at least one glyph cell
    /// changed. Returns whether it was.
    pub fn refresh<G: GlyphDisplay>(&mut self, view: &ScreenView, display: &mut G) -> bool {
        let mut touched = 0;
        touched += self.frequency.update(
            display,
            &frequency_text(view.band_type, view.frequency, view.bfo_enabled),
        );
        touched += self
            .mode
            .update(display, mode_text(view.band_type, view.mode, view.frequency));
        touched += self.unit.update(display, unit_text(view.band_type));
        touched += self.status.update(display, &status_text(&view.status));
        touched += self
            .bfo
            .update(display, &bfo_text(view.mode, view.bfo_offset, view.bfo_step));
        touched += self.volume.update(display, &volume_text(view.volume));
        touched += self.rssi.update(display, &rssi_text(view.rssi));

        if touched > 0 {
            display.present();
        }
        touched > 0
    }

    /// Frequency text currently on the panel
    #[must_use]
    pub fn frequency_drawn(&self) -> &str {
        self.frequency.drawn()
    }

    /// Mode label currently on the panel
    #[must_use]
    pub fn mode_drawn(&self) -> &str {
        self.mode.drawn()
    }

    /// Unit label currently on the panel
    #[must_use]
    pub fn unit_drawn(&self) -> &str {
        self.unit.drawn()
    }

    /// Status text currently on the panel
    #[must_use]
    pub fn status_drawn(&self) -> &str {
        self.status.drawn()
    }

    /// BFO text currently on the panel
    #[must_use]
    pub fn bfo_drawn(&self) -> &str {
        self.bfo.drawn()
    }

    fn fields_mut(&mut self) -> [&mut Field; 7] {
        [
            &mut self.frequency,
            &mut self.mode,
            &mut self.unit,
            &mut self.status,
            &mut self.bfo,
            &mut self.volume,
            &mut self.rssi,
        ]
    }
}

impl Default for StatusScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the power-on splash: title and firmware version
pub fn show_splash<G: GlyphDisplay>(display: &mut G, version: &str) {
    display.clear();
    draw_text(display, 16, 8, GlyphSize::Large, "SSB RX");
    draw_text(display, 16, 40, GlyphSize::Small, "AM FM LSB USB");
    draw_text(display, 16, 52, GlyphSize::Small, "v");
    draw_text(display, 22, 52, GlyphSize::Small, version);
    display.present();
}

fn draw_text<G: GlyphDisplay>(display: &mut G, x: i32, y: i32, size: GlyphSize, text: &str) {
    let mut col = x;
    for glyph in text.chars() {
        display.draw_glyph(col, y, glyph, size, GlyphColor::Foreground);
        col += size.advance();
    }
}
