//! Tuner command interface
//!
//! The capability set the receiver core drives. Every call is treated as
//! succeeding; an implementation that talks to real hardware absorbs bus
//! faults itself and hands back the last value it knows.

use crate::types::{BandType, BusSpeed, Sideband, SsbConfig, TuneRange};

/// Commands the receiver core issues to the tuner chip
pub trait Tuner {
    /// Pulse the reset line, check the chip answers and power it up for
    /// `band_type`
    fn probe_and_configure(&mut self, band_type: BandType);

    /// Select the bus clock used for subsequent transfers
    fn set_bus_speed(&mut self, speed: BusSpeed);

    /// Enter FM reception over `range`
    fn set_fm(&mut self, range: TuneRange);

    /// Enter AM reception over `range`
    fn set_am(&mut self, range: TuneRange);

    /// Enter SSB reception over `range` on the given sideband
    ///
    /// Requires the SSB patch to be loaded.
    fn set_ssb(&mut self, range: TuneRange, sideband: Sideband);

    /// Antenna capacitor mode used by the next AM/SSB tune
    fn set_antenna_capacitor(&mut self, mode: u16);

    /// AGC override: `disable` turns the AGC off, `index` picks the fixed
    /// attenuation used while it is off
    fn set_agc(&mut self, disable: bool, index: u8);

    /// AM soft mute ceiling in dB (0 disables soft mute)
    fn set_am_soft_mute_max_attenuation(&mut self, level: u8);

    /// SSB automatic volume control
    fn set_ssb_avc(&mut self, enable: bool);

    /// SSB soft mute ceiling in dB (0 disables soft mute)
    fn set_ssb_soft_mute_max_attenuation(&mut self, level: u8);

    /// SSB audio bandwidth index (0..=5)
    fn set_ssb_audio_bandwidth(&mut self, index: u8);

    /// SSB sideband cutoff filter (0 = band pass, 1 = low pass)
    fn set_sideband_cutoff_filter(&mut self, mode: u8);

    /// Full SSB configuration in one property write
    fn set_ssb_config(&mut self, config: SsbConfig);

    /// AM channel filter index (0..=6) and power line noise filter
    fn set_am_bandwidth(&mut self, index: u8, line_filter: bool);

    /// Step used by [`Tuner::frequency_up`] and [`Tuner::frequency_down`]
    fn set_frequency_step(&mut self, step: u16);

    /// Tune one step up, wrapping to the lower band edge
    fn frequency_up(&mut self);

    /// Tune one step down, wrapping to the upper band edge
    fn frequency_down(&mut self);

    /// Frequency the chip is tuned to
    fn frequency(&mut self) -> u16;

    /// Seek to the next station above the current frequency
    fn seek_station_up(&mut self);

    /// FM stereo blending
    fn set_fm_stereo(&mut self, enable: bool);

    /// Raise volume by one step
    fn volume_up(&mut self);

    /// Lower volume by one step
    fn volume_down(&mut self);

    /// Volume the chip reports
    fn volume(&mut self) -> u8;

    /// SSB beat frequency oscillator offset in Hz
    fn set_bfo(&mut self, offset_hz: i16);

    /// Hardware reset of the chip
    fn reset(&mut self);

    /// Power up in library-id query mode
    fn query_library_id(&mut self);

    /// Power up ready to accept a patch
    fn patch_power_up(&mut self);

    /// Stream the patch content into the chip
    fn download_patch(&mut self, patch: &[u8]);

    /// Latch the current signal quality so RSSI/SNR reads are fresh
    fn refresh_signal_quality(&mut self);

    /// RSSI of the latched signal quality in dBuV
    fn rssi(&mut self) -> u8;

    /// SNR of the latched signal quality in dB
    fn snr(&mut self) -> u8;
}
