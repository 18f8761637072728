//! Shared types used across the receiver firmware
//!
//! Closed enums for everything the state machine dispatches on, so every
//! transition is an exhaustive `match`.

/// Operating mode of the receiver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Wideband FM broadcast
    #[default]
    Fm,
    /// Lower sideband
    Lsb,
    /// Upper sideband
    Usb,
    /// Amplitude modulation
    Am,
}

impl Mode {
    /// Three-character label shown on the display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fm => "FM ",
            Self::Lsb => "LSB",
            Self::Usb => "USB",
            Self::Am => "AM ",
        }
    }

    /// Check if this mode demodulates single sideband
    #[must_use]
    pub const fn is_ssb(self) -> bool {
        matches!(self, Self::Lsb | Self::Usb)
    }

    /// Sideband selector passed to the tuner, `None` outside SSB
    #[must_use]
    pub const fn sideband(self) -> Option<Sideband> {
        match self {
            Self::Lsb => Some(Sideband::Lower),
            Self::Usb => Some(Sideband::Upper),
            Self::Fm | Self::Am => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Mode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Fm => defmt::write!(f, "FM"),
            Self::Lsb => defmt::write!(f, "LSB"),
            Self::Usb => defmt::write!(f, "USB"),
            Self::Am => defmt::write!(f, "AM"),
        }
    }
}

/// Kind of a band in the band table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandType {
    /// FM broadcast, frequencies in 10 kHz units
    Fm,
    /// Long wave, frequencies in kHz
    Lw,
    /// Medium wave, frequencies in kHz
    Mw,
    /// Short wave, frequencies in kHz
    Sw,
}

impl BandType {
    /// Display unit for frequencies of this band type
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Fm => "MHz",
            Self::Lw | Self::Mw | Self::Sw => "KHz",
        }
    }

    /// Antenna capacitor mode used when tuning this band type
    ///
    /// 0 lets the chip pick the capacitance automatically, 1 is the
    /// short wave setting for a whip antenna.
    #[must_use]
    pub const fn antenna_capacitor(self) -> u16 {
        match self {
            Self::Fm | Self::Lw | Self::Mw => 0,
            Self::Sw => 1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BandType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Fm => defmt::write!(f, "FM"),
            Self::Lw => defmt::write!(f, "LW"),
            Self::Mw => defmt::write!(f, "MW"),
            Self::Sw => defmt::write!(f, "SW"),
        }
    }
}

/// Sideband selected in SSB mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sideband {
    /// Lower sideband
    Lower,
    /// Upper sideband
    Upper,
}

impl Sideband {
    /// USBLSB field of the AM_TUNE_FREQ command
    #[must_use]
    pub const fn as_reg(self) -> u8 {
        match self {
            Self::Lower => 1,
            Self::Upper => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Sideband {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Lower => defmt::write!(f, "LSB"),
            Self::Upper => defmt::write!(f, "USB"),
        }
    }
}

/// I2C bus speed requested from the tuner adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BusSpeed {
    /// 100 kHz standard mode
    #[default]
    Standard,
    /// 400 kHz fast mode
    Fast,
}

impl BusSpeed {
    /// Bus clock in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Standard => 100_000,
            Self::Fast => 400_000,
        }
    }
}

/// Tuning range and position handed to the tuner when switching bands
///
/// Units follow the band type: 10 kHz for FM, kHz otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneRange {
    /// Lower band edge
    pub min: u16,
    /// Upper band edge
    pub max: u16,
    /// Frequency to tune
    pub current: u16,
    /// Tuning step
    pub step: u16,
}

impl TuneRange {
    /// Clamp `current` into `min..=max`
    #[must_use]
    pub const fn clamped(self) -> Self {
        let current = if self.current < self.min {
            self.min
        } else if self.current > self.max {
            self.max
        } else {
            self.current
        };
        Self { current, ..self }
    }

    /// One step up; past the upper edge wraps to the lower edge
    #[must_use]
    pub const fn step_up(self) -> Self {
        let current = if self.current >= self.max {
            self.min
        } else {
            let next = self.current.saturating_add(self.step);
            if next > self.max {
                self.max
            } else {
                next
            }
        };
        Self { current, ..self }
    }

    /// One step down; past the lower edge wraps to the upper edge
    #[must_use]
    pub const fn step_down(self) -> Self {
        let current = if self.current <= self.min {
            self.max
        } else {
            let next = self.current.saturating_sub(self.step);
            if next < self.min {
                self.min
            } else {
                next
            }
        };
        Self { current, ..self }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneRange {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}..{} @{} step {}",
            self.min,
            self.max,
            self.current,
            self.step
        );
    }
}

/// Parameters of the SSB_MODE property applied after the patch is loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SsbConfig {
    /// Audio bandwidth index (0..=5)
    pub audio_bandwidth: u8,
    /// Sideband cutoff filter (0 = band pass, 1 = low pass)
    pub cutoff_filter: u8,
    /// AVC divider (0 for SSB, 3 for sync AM)
    pub avc_divider: u8,
    /// Automatic volume control enabled
    pub avc_enable: bool,
    /// Soft mute based on SNR instead of RSSI
    pub soft_mute_snr: bool,
    /// DSP AFC disabled (SSB mode) instead of enabled (sync mode)
    pub afc_disable: bool,
}

impl SsbConfig {
    /// Fixed SSB configuration used by the patch loader
    #[must_use]
    pub const fn for_bandwidth(audio_bandwidth: u8) -> Self {
        Self {
            audio_bandwidth,
            cutoff_filter: 1,
            avc_divider: 0,
            avc_enable: true,
            soft_mute_snr: false,
            afc_disable: true,
        }
    }

    /// Encode as the 16-bit SSB_MODE property value
    #[must_use]
    pub const fn as_property(self) -> u16 {
        (self.audio_bandwidth as u16 & 0x0F)
            | ((self.cutoff_filter as u16 & 0x0F) << 4)
            | ((self.avc_divider as u16 & 0x0F) << 8)
            | ((self.avc_enable as u16) << 12)
            | ((self.soft_mute_snr as u16) << 13)
            | ((self.afc_disable as u16) << 15)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SsbConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SsbConfig(0x{:04X})", self.as_property());
    }
}
