//! Band table
//!
//! Static catalog of the receivable bands. Each entry remembers where it
//! was last tuned so switching back to a band restores frequency and step.

use crate::types::{BandType, TuneRange};

/// A contiguous tunable range with its remembered tuning state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    /// Band kind
    pub band_type: BandType,
    /// Lower edge (10 kHz units for FM, kHz otherwise)
    pub min_freq: u16,
    /// Upper edge
    pub max_freq: u16,
    /// Last tuned frequency
    pub current_freq: u16,
    /// Last used tuning step
    pub current_step: u16,
}

impl Band {
    /// Create a band entry
    #[must_use]
    pub const fn new(
        band_type: BandType,
        min_freq: u16,
        max_freq: u16,
        current_freq: u16,
        current_step: u16,
    ) -> Self {
        Self {
            band_type,
            min_freq,
            max_freq,
            current_freq,
            current_step,
        }
    }

    /// Range handed to the tuner when this band is applied
    #[must_use]
    pub const fn tune_range(&self) -> TuneRange {
        TuneRange {
            min: self.min_freq,
            max: self.max_freq,
            current: self.current_freq,
            step: self.current_step,
        }
    }

    /// Check if `freq` lies inside the band
    #[must_use]
    pub const fn contains(&self, freq: u16) -> bool {
        freq >= self.min_freq && freq <= self.max_freq
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} {}..{} @{}",
            self.band_type,
            self.min_freq,
            self.max_freq,
            self.current_freq
        );
    }
}

/// Number of bands in the default table
pub const BAND_COUNT: usize = 20;

/// Bands available at power-up
pub const DEFAULT_BANDS: [Band; BAND_COUNT] = [
    Band::new(BandType::Fm, 8400, 10800, 10390, 10),
    Band::new(BandType::Lw, 100, 510, 300, 1),
    Band::new(BandType::Mw, 520, 1720, 810, 10),
    Band::new(BandType::Sw, 1800, 3500, 1900, 1), // 160m
    Band::new(BandType::Sw, 3500, 4500, 3700, 1), // 80m
    Band::new(BandType::Sw, 4500, 5500, 4850, 5),
    Band::new(BandType::Sw, 5600, 6300, 6000, 5),
    Band::new(BandType::Sw, 6800, 7800, 7200, 5), // 40m
    Band::new(BandType::Sw, 9200, 10000, 9600, 5),
    Band::new(BandType::Sw, 10000, 11000, 10100, 1), // 30m
    Band::new(BandType::Sw, 11200, 12500, 11940, 5),
    Band::new(BandType::Sw, 13400, 13900, 13600, 5),
    Band::new(BandType::Sw, 14000, 14500, 14200, 1), // 20m
    Band::new(BandType::Sw, 15000, 15900, 15300, 5),
    Band::new(BandType::Sw, 17200, 17900, 17600, 5),
    Band::new(BandType::Sw, 18000, 18300, 18100, 1), // 17m
    Band::new(BandType::Sw, 21000, 21900, 21200, 1), // 15m
    Band::new(BandType::Sw, 24890, 26200, 24940, 1), // 12m
    Band::new(BandType::Sw, 26200, 27900, 27500, 1), // CB
    Band::new(BandType::Sw, 28000, 30000, 28400, 1), // 10m
];

/// The band catalog with circular navigation
#[derive(Clone, Debug)]
pub struct BandTable {
    bands: [Band; BAND_COUNT],
}

impl BandTable {
    /// Create a table from explicit entries
    #[must_use]
    pub const fn new(bands: [Band; BAND_COUNT]) -> Self {
        Self { bands }
    }

    /// Number of bands
    #[must_use]
    pub const fn len(&self) -> usize {
        BAND_COUNT
    }

    /// Always false; the table is fixed size
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        BAND_COUNT == 0
    }

    /// Band at `index`; `index` is kept valid by [`BandTable::next_index`]
    /// and [`BandTable::prev_index`]
    #[must_use]
    pub fn get(&self, index: usize) -> &Band {
        &self.bands[index % BAND_COUNT]
    }

    /// Mutable band at `index`
    pub fn get_mut(&mut self, index: usize) -> &mut Band {
        &mut self.bands[index % BAND_COUNT]
    }

    /// Index after `index`, wrapping to the first band
    #[must_use]
    pub const fn next_index(&self, index: usize) -> usize {
        if index + 1 >= BAND_COUNT {
            0
        } else {
            index + 1
        }
    }

    /// Index before `index`, wrapping to the last band
    #[must_use]
    pub const fn prev_index(&self, index: usize) -> usize {
        if index == 0 {
            BAND_COUNT - 1
        } else {
            index - 1
        }
    }

    /// Save the working frequency and step into the band at `index`
    pub fn remember(&mut self, index: usize, freq: u16, step: u16) {
        let band = self.get_mut(index);
        band.current_freq = freq;
        band.current_step = step;
    }

    /// Iterate over all bands
    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::new(DEFAULT_BANDS)
    }
}
