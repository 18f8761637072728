//! Field formatting
//!
//! Fixed-width strings for every field of the status screen.

use core::fmt::Write;

use super::render::FieldText;
use crate::config::MW_LOWER_EDGE_KHZ;
use crate::types::{BandType, Mode};

/// SSB audio bandwidth labels in kHz, by bandwidth index
pub const SSB_BANDWIDTHS: [&str; 6] = ["1.2", "2.2", "3.0", "4.0", "0.5", "1.0"];

/// AM channel filter labels in kHz, by bandwidth index
pub const AM_BANDWIDTHS: [&str; 7] = ["6", "4", "3", "2", "1", "1.8", "2.5"];

/// Frequency field
///
/// FM values are in 10 kHz units and get a decimal point after the third
/// character (`10570` -> `105.70`). Other bands show the kHz value zero
/// padded to five digits. While BFO adjustment is active the value is
/// bracketed as `>...<`.
#[must_use]
pub fn frequency_text(band_type: BandType, freq: u16, bfo_active: bool) -> FieldText {
    let mut digits = FieldText::new();
    match band_type {
        BandType::Fm => {
            let _ = write!(digits, "{freq:5}");
        }
        BandType::Lw | BandType::Mw | BandType::Sw => {
            let _ = write!(digits, "{freq:05}");
        }
    }

    let mut out = FieldText::new();
    if bfo_active {
        let _ = out.push('>');
    }
    match band_type {
        BandType::Fm => {
            let (whole, fraction) = digits.split_at(3);
            let _ = write!(out, "{whole}.{fraction}");
        }
        BandType::Lw | BandType::Mw | BandType::Sw => {
            let _ = out.push_str(&digits);
        }
    }
    if bfo_active {
        let _ = out.push('<');
    }
    out
}

/// Mode label
///
/// AM-family frequencies below the MW band edge read `LW` whatever the
/// stored mode is.
#[must_use]
pub const fn mode_text(band_type: BandType, mode: Mode, freq: u16) -> &'static str {
    match band_type {
        BandType::Fm => mode.label(),
        BandType::Lw | BandType::Mw | BandType::Sw => {
            if freq < MW_LOWER_EDGE_KHZ {
                "LW"
            } else {
                mode.label()
            }
        }
    }
}

/// Frequency unit label
#[must_use]
pub const fn unit_text(band_type: BandType) -> &'static str {
    band_type.unit()
}

/// Volume field, `V:45`
#[must_use]
pub fn volume_text(volume: u8) -> FieldText {
    let mut out = FieldText::new();
    let _ = write!(out, "V:{volume:2}");
    out
}

/// Signal strength field, `S:32dBuV`
#[must_use]
pub fn rssi_text(rssi: u8) -> FieldText {
    let mut out = FieldText::new();
    let _ = write!(out, "S:{rssi:2}dBuV");
    out
}

/// BFO field, shown only in SSB: `BFO:+125 25Hz`
#[must_use]
pub fn bfo_text(mode: Mode, offset_hz: i16, step_hz: i16) -> FieldText {
    let mut out = FieldText::new();
    if mode.is_ssb() {
        let _ = write!(out, "BFO:{offset_hz:+} {step_hz}Hz");
    }
    out
}

/// Inputs of the status field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusInfo {
    /// Operating mode
    pub mode: Mode,
    /// Tuning step in band units
    pub step: u16,
    /// SSB bandwidth index
    pub ssb_bandwidth: u8,
    /// AM bandwidth index
    pub am_bandwidth: u8,
    /// FM stereo blending enabled
    pub stereo: bool,
    /// AGC active on the chip
    pub agc_active: bool,
}

/// Status field: stereo flag in FM, step, bandwidth and AGC marker otherwise
#[must_use]
pub fn status_text(info: &StatusInfo) -> FieldText {
    let mut out = FieldText::new();
    let bandwidth = match info.mode {
        Mode::Fm => {
            let _ = out.push_str(if info.stereo { "STEREO" } else { "MONO" });
            return out;
        }
        Mode::Lsb | Mode::Usb => SSB_BANDWIDTHS
            .get(usize::from(info.ssb_bandwidth))
            .copied()
            .unwrap_or("?"),
        Mode::Am => AM_BANDWIDTHS
            .get(usize::from(info.am_bandwidth))
            .copied()
            .unwrap_or("?"),
    };
    let _ = write!(out, "STP:{} BW:{}", info.step, bandwidth);
    if info.agc_active {
        let _ = out.push_str(" AGC");
    }
    out
}
