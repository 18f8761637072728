//! `Si4735` Broadcast Receiver Driver
//!
//! Command-level driver for the Si4735 AM/FM/SW tuner over blocking I2C.
//! Every command is a byte string written to the chip, followed by a poll
//! of the status byte until CTS (clear to send) is set and an optional
//! response read.
//!
//! The driver keeps a shadow of the band range, volume and the `SSB_MODE`
//! property so the receiver core can issue relative and partial updates.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, TUNER_I2C_ADDR};
use crate::tuner::Tuner;
use crate::types::{BandType, BusSpeed, Sideband, SsbConfig, TuneRange};

/// `Si4735` command bytes
mod cmd {
    pub const POWER_UP: u8 = 0x01;
    pub const GET_REV: u8 = 0x10;
    pub const POWER_DOWN: u8 = 0x11;
    pub const SET_PROPERTY: u8 = 0x12;
    pub const GET_INT_STATUS: u8 = 0x14;
    pub const FM_TUNE_FREQ: u8 = 0x20;
    pub const FM_SEEK_START: u8 = 0x21;
    pub const FM_TUNE_STATUS: u8 = 0x22;
    pub const FM_RSQ_STATUS: u8 = 0x23;
    pub const FM_AGC_OVERRIDE: u8 = 0x28;
    pub const AM_TUNE_FREQ: u8 = 0x40;
    pub const AM_SEEK_START: u8 = 0x41;
    pub const AM_TUNE_STATUS: u8 = 0x42;
    pub const AM_RSQ_STATUS: u8 = 0x43;
    pub const AM_AGC_OVERRIDE: u8 = 0x48;
}

/// `POWER_UP` arguments
mod power {
    /// Crystal oscillator enabled, FM receive
    pub const FM: u8 = 0x10;
    /// Crystal oscillator enabled, AM/SW/LW receive
    pub const AM: u8 = 0x11;
    /// Crystal oscillator enabled, query library id
    pub const QUERY_LIBRARY_ID: u8 = 0x1F;
    /// Patch enable, crystal oscillator enabled, AM receive
    pub const PATCH: u8 = 0x31;
    /// Analog audio output
    pub const ANALOG_OUT: u8 = 0x05;
}

/// `Si4735` property ids
mod prop {
    pub const SSB_BFO: u16 = 0x0100;
    pub const SSB_MODE: u16 = 0x0101;
    pub const FM_SEEK_BAND_BOTTOM: u16 = 0x1400;
    pub const FM_SEEK_BAND_TOP: u16 = 0x1401;
    pub const FM_SEEK_FREQ_SPACING: u16 = 0x1402;
    pub const FM_BLEND_RSSI_STEREO_THRESHOLD: u16 = 0x1800;
    pub const FM_BLEND_RSSI_MONO_THRESHOLD: u16 = 0x1801;
    pub const AM_CHANNEL_FILTER: u16 = 0x3102;
    pub const AM_SOFT_MUTE_MAX_ATTENUATION: u16 = 0x3302;
    pub const AM_SEEK_BAND_BOTTOM: u16 = 0x3400;
    pub const AM_SEEK_BAND_TOP: u16 = 0x3401;
    pub const AM_SEEK_FREQ_SPACING: u16 = 0x3402;
    pub const RX_VOLUME: u16 = 0x4000;
}

/// Status byte bits
mod status {
    pub const CTS: u8 = 0x80;
    pub const ERR: u8 = 0x40;
    pub const STC: u8 = 0x01;
}

/// Seek up with wrap at the band edges
const SEEK_UP_WRAP: u8 = 0x0C;

/// Tune/RSQ status argument acknowledging the interrupt
const INTACK: u8 = 0x01;

/// Patch lines are streamed in chunks of this size
pub const PATCH_CHUNK_LEN: usize = 8;

/// CTS polls before a command is reported as unanswered
const CTS_RETRIES: u32 = 100;

/// STC polls before a tune or seek is reported as unanswered
const STC_RETRIES: u32 = 500;

/// Reset pulse width and recovery time
const RESET_PULSE_MS: u32 = 10;

/// Bit 12 of `SSB_MODE`, the AVC enable
const SSB_MODE_AVCEN: u16 = 1 << 12;

/// FM stereo blend thresholds (stereo, mono) in dBuV
const BLEND_STEREO: (u16, u16) = (49, 30);

/// Thresholds above the RSSI range, forcing mono
const BLEND_MONO_ONLY: (u16, u16) = (127, 127);

/// Driver error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Bus transfer failed
    I2c(ErrorKind),
    /// CTS or STC never came up
    NoResponse,
    /// Chip did not identify itself
    NotDetected,
    /// Chip flagged the command as invalid
    InvalidResponse,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::I2c(kind) => defmt::write!(f, "I2C({})", defmt::Debug2Format(kind)),
            Self::NoResponse => defmt::write!(f, "NoResponse"),
            Self::NotDetected => defmt::write!(f, "NotDetected"),
            Self::InvalidResponse => defmt::write!(f, "InvalidResponse"),
        }
    }
}

/// Driver operation result
pub type DriverResult<T> = Result<T, Error>;

/// Receiver function the chip was powered up into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    /// FM receive
    Fm,
    /// AM/SW/LW receive
    Am,
    /// AM receive running the downloaded SSB patch
    Ssb,
}

/// Tune status decoded from `FM_TUNE_STATUS` / `AM_TUNE_STATUS`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneStatus {
    /// Tuned frequency in band units
    pub frequency: u16,
    /// RSSI in dBuV
    pub rssi: u8,
    /// SNR in dB
    pub snr: u8,
}

impl TuneStatus {
    /// Decode a status response; byte 0 is the status byte
    #[must_use]
    pub fn from_bytes(data: &[u8; 8]) -> Self {
        Self {
            frequency: u16::from_be_bytes([data[2], data[3]]),
            rssi: data[4],
            snr: data[5],
        }
    }
}

/// `Si4735` driver
pub struct Si4735<I2C, RST, D> {
    i2c: I2C,
    reset_pin: RST,
    delay: D,
    address: u8,
    function: Option<Function>,
    range: TuneRange,
    sideband: Option<Sideband>,
    antenna_capacitor: u16,
    volume: u8,
    ssb_mode: u16,
    rssi: u8,
    snr: u8,
    bus_speed: BusSpeed,
}

impl<I2C, RST, D> Si4735<I2C, RST, D>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a driver at the default address; the chip stays untouched
    /// until [`Tuner::probe_and_configure`]
    pub fn new(i2c: I2C, reset_pin: RST, delay: D) -> Self {
        Self::with_address(i2c, reset_pin, delay, TUNER_I2C_ADDR)
    }

    /// Create a driver at an explicit 7-bit address (SEN pin high = 0x63)
    pub fn with_address(i2c: I2C, reset_pin: RST, delay: D, address: u8) -> Self {
        Self {
            i2c,
            reset_pin,
            delay,
            address,
            function: None,
            range: TuneRange {
                min: 0,
                max: 0,
                current: 0,
                step: 1,
            },
            sideband: None,
            antenna_capacitor: 0,
            volume: DEFAULT_VOLUME,
            ssb_mode: SsbConfig::for_bandwidth(0).as_property(),
            rssi: 0,
            snr: 0,
            bus_speed: BusSpeed::Standard,
        }
    }

    /// Release the bus, reset pin and delay
    pub fn release(self) -> (I2C, RST, D) {
        (self.i2c, self.reset_pin, self.delay)
    }

    /// Function the chip is powered up into
    #[must_use]
    pub const fn function(&self) -> Option<Function> {
        self.function
    }

    /// Shadowed band range and position
    #[must_use]
    pub const fn range(&self) -> TuneRange {
        self.range
    }

    /// Shadowed `SSB_MODE` property value
    #[must_use]
    pub const fn ssb_mode(&self) -> u16 {
        self.ssb_mode
    }

    /// Bus speed last requested
    #[must_use]
    pub const fn bus_speed(&self) -> BusSpeed {
        self.bus_speed
    }

    /// Pulse the reset line
    pub fn hardware_reset(&mut self) {
        // The pin is a plain GPIO; a failed write leaves the chip as it was
        let _ = self.reset_pin.set_low();
        self.delay.delay_ms(RESET_PULSE_MS);
        let _ = self.reset_pin.set_high();
        self.delay.delay_ms(RESET_PULSE_MS);
        self.function = None;
    }

    /// Write a command, wait for CTS, read `resp` if it is not empty
    ///
    /// `resp[0]` receives the status byte.
    pub fn command(&mut self, args: &[u8], resp: &mut [u8]) -> DriverResult<()> {
        self.i2c
            .write(self.address, args)
            .map_err(|e| Error::I2c(e.kind()))?;
        let status = self.wait_cts()?;
        if status & status::ERR != 0 {
            return Err(Error::InvalidResponse);
        }
        if !resp.is_empty() {
            self.i2c
                .read(self.address, resp)
                .map_err(|e| Error::I2c(e.kind()))?;
        }
        Ok(())
    }

    /// Poll the status byte until CTS is set
    fn wait_cts(&mut self) -> DriverResult<u8> {
        for _ in 0..CTS_RETRIES {
            let mut status = [0u8];
            self.i2c
                .read(self.address, &mut status)
                .map_err(|e| Error::I2c(e.kind()))?;
            if status[0] & status::CTS != 0 {
                return Ok(status[0]);
            }
            self.delay.delay_ms(1);
        }
        Err(Error::NoResponse)
    }

    /// Poll the interrupt status until the seek/tune complete bit is set
    fn wait_stc(&mut self) -> DriverResult<()> {
        for _ in 0..STC_RETRIES {
            let mut resp = [0u8];
            self.command(&[cmd::GET_INT_STATUS], &mut resp)?;
            if resp[0] & status::STC != 0 {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(Error::NoResponse)
    }

    /// Write one property
    pub fn set_property(&mut self, property: u16, value: u16) -> DriverResult<()> {
        let [prop_hi, prop_lo] = property.to_be_bytes();
        let [value_hi, value_lo] = value.to_be_bytes();
        self.command(
            &[cmd::SET_PROPERTY, 0, prop_hi, prop_lo, value_hi, value_lo],
            &mut [],
        )
    }

    /// Power up into `function` with analog audio out
    pub fn power_up(&mut self, function: Function) -> DriverResult<()> {
        let arg = match function {
            Function::Fm => power::FM,
            Function::Am => power::AM,
            Function::Ssb => power::PATCH,
        };
        self.command(&[cmd::POWER_UP, arg, power::ANALOG_OUT], &mut [])?;
        self.function = Some(function);
        Ok(())
    }

    /// Power down, dropping any loaded patch
    pub fn power_down(&mut self) -> DriverResult<()> {
        self.command(&[cmd::POWER_DOWN], &mut [])?;
        self.function = None;
        Ok(())
    }

    /// Part number from `GET_REV`
    pub fn part_number(&mut self) -> DriverResult<u8> {
        let mut resp = [0u8; 9];
        self.command(&[cmd::GET_REV], &mut resp)?;
        match resp[1] {
            0x00 | 0xFF => Err(Error::NotDetected),
            pn => Ok(pn),
        }
    }

    /// Reset, power up for `band_type` and check the part number
    pub fn probe(&mut self, band_type: BandType) -> DriverResult<u8> {
        self.hardware_reset();
        self.power_up(function_for(band_type))?;
        let part = self.part_number()?;
        self.set_property(prop::RX_VOLUME, u16::from(self.volume))?;

        #[cfg(feature = "embedded")]
        defmt::info!("Si47{=u8} detected", part);

        Ok(part)
    }

    /// Power cycle into `function` unless it is already active
    fn ensure_function(&mut self, function: Function) -> DriverResult<()> {
        if self.function == Some(function) {
            return Ok(());
        }
        if self.function.is_some() {
            self.power_down()?;
        }
        self.power_up(function)?;
        self.set_property(prop::RX_VOLUME, u16::from(self.volume))
    }

    /// Program the seek band edges and spacing for the current function
    fn apply_band_limits(&mut self) -> DriverResult<()> {
        let (bottom, top, spacing) = match self.function {
            Some(Function::Fm) => (
                prop::FM_SEEK_BAND_BOTTOM,
                prop::FM_SEEK_BAND_TOP,
                prop::FM_SEEK_FREQ_SPACING,
            ),
            _ => (
                prop::AM_SEEK_BAND_BOTTOM,
                prop::AM_SEEK_BAND_TOP,
                prop::AM_SEEK_FREQ_SPACING,
            ),
        };
        self.set_property(bottom, self.range.min)?;
        self.set_property(top, self.range.max)?;
        self.set_property(spacing, self.range.step)
    }

    /// Tune to the shadowed frequency and read the result back
    pub fn tune(&mut self) -> DriverResult<TuneStatus> {
        let [freq_hi, freq_lo] = self.range.current.to_be_bytes();
        match self.function {
            Some(Function::Fm) => {
                self.command(&[cmd::FM_TUNE_FREQ, 0, freq_hi, freq_lo, 0], &mut [])?;
            }
            Some(Function::Am | Function::Ssb) => {
                let mode = self.sideband.map_or(0, |s| s.as_reg() << 6);
                let [cap_hi, cap_lo] = self.antenna_capacitor.to_be_bytes();
                self.command(
                    &[cmd::AM_TUNE_FREQ, mode, freq_hi, freq_lo, cap_hi, cap_lo],
                    &mut [],
                )?;
            }
            None => return Err(Error::NoResponse),
        }
        self.wait_stc()?;
        self.tune_status()
    }

    /// Read the tune status and update the shadow
    pub fn tune_status(&mut self) -> DriverResult<TuneStatus> {
        let command = match self.function {
            Some(Function::Fm) => cmd::FM_TUNE_STATUS,
            Some(Function::Am | Function::Ssb) => cmd::AM_TUNE_STATUS,
            None => return Err(Error::NoResponse),
        };
        let mut resp = [0u8; 8];
        self.command(&[command, INTACK], &mut resp)?;
        let status = TuneStatus::from_bytes(&resp);
        self.range.current = status.frequency;
        self.rssi = status.rssi;
        self.snr = status.snr;
        Ok(status)
    }

    /// Read the received signal quality
    pub fn signal_quality(&mut self) -> DriverResult<(u8, u8)> {
        let command = match self.function {
            Some(Function::Fm) => cmd::FM_RSQ_STATUS,
            Some(Function::Am | Function::Ssb) => cmd::AM_RSQ_STATUS,
            None => return Err(Error::NoResponse),
        };
        let mut resp = [0u8; 8];
        self.command(&[command, INTACK], &mut resp)?;
        self.rssi = resp[4];
        self.snr = resp[5];
        Ok((self.rssi, self.snr))
    }

    /// Start a seek up with wrap and read the station found
    pub fn seek_up(&mut self) -> DriverResult<TuneStatus> {
        match self.function {
            Some(Function::Fm) => self.command(&[cmd::FM_SEEK_START, SEEK_UP_WRAP], &mut [])?,
            Some(Function::Am | Function::Ssb) => {
                self.command(&[cmd::AM_SEEK_START, SEEK_UP_WRAP, 0, 0, 0, 0], &mut [])?;
            }
            None => return Err(Error::NoResponse),
        }
        self.wait_stc()?;
        self.tune_status()
    }

    /// Enter FM over `range`
    pub fn fm(&mut self, range: TuneRange) -> DriverResult<TuneStatus> {
        self.ensure_function(Function::Fm)?;
        self.range = range.clamped();
        self.sideband = None;
        self.apply_band_limits()?;
        self.tune()
    }

    /// Enter AM over `range`
    pub fn am(&mut self, range: TuneRange) -> DriverResult<TuneStatus> {
        self.ensure_function(Function::Am)?;
        self.range = range.clamped();
        self.sideband = None;
        self.apply_band_limits()?;
        self.tune()
    }

    /// Enter SSB over `range`
    ///
    /// The patch lives in RAM, so the chip is not power cycled here. The
    /// reset ahead of the patch load clears `RX_VOLUME`, so the volume is
    /// written again. Leaving SSB through [`Self::am`] powers the chip down.
    pub fn ssb(&mut self, range: TuneRange, sideband: Sideband) -> DriverResult<TuneStatus> {
        if self.function.is_none() {
            return Err(Error::NoResponse);
        }
        self.function = Some(Function::Ssb);
        self.range = range.clamped();
        self.sideband = Some(sideband);
        self.set_property(prop::RX_VOLUME, u16::from(self.volume))?;
        self.apply_band_limits()?;
        self.set_property(prop::SSB_MODE, self.ssb_mode)?;
        self.tune()
    }

    /// AGC override for the current function
    pub fn agc_override(&mut self, disable: bool, index: u8) -> DriverResult<()> {
        let command = match self.function {
            Some(Function::Fm) => cmd::FM_AGC_OVERRIDE,
            Some(Function::Am | Function::Ssb) => cmd::AM_AGC_OVERRIDE,
            None => return Err(Error::NoResponse),
        };
        self.command(&[command, u8::from(disable), index], &mut [])
    }

    /// Replace part of the shadowed `SSB_MODE` and write it
    fn update_ssb_mode(&mut self, mask: u16, value: u16) -> DriverResult<()> {
        self.ssb_mode = (self.ssb_mode & !mask) | (value & mask);
        self.set_property(prop::SSB_MODE, self.ssb_mode)
    }

    /// Write the volume and shadow it
    pub fn set_volume(&mut self, volume: u8) -> DriverResult<()> {
        let volume = volume.min(MAX_VOLUME);
        self.set_property(prop::RX_VOLUME, u16::from(volume))?;
        self.volume = volume;
        Ok(())
    }

    /// Stream patch lines into the chip, waiting for CTS after each
    pub fn write_patch(&mut self, patch: &[u8]) -> DriverResult<()> {
        for line in patch.chunks(PATCH_CHUNK_LEN) {
            self.command(line, &mut [])?;
        }
        Ok(())
    }

    /// Power up in library-id mode and read the id response
    pub fn library_id(&mut self) -> DriverResult<u8> {
        let mut resp = [0u8; 8];
        self.command(
            &[cmd::POWER_UP, power::QUERY_LIBRARY_ID, power::ANALOG_OUT],
            &mut resp,
        )?;
        Ok(resp[7])
    }

    /// Power up accepting a patch
    pub fn power_up_patch(&mut self) -> DriverResult<()> {
        self.power_up(Function::Ssb)
    }
}

/// Function a band type is received with
#[must_use]
pub const fn function_for(band_type: BandType) -> Function {
    match band_type {
        BandType::Fm => Function::Fm,
        BandType::Lw | BandType::Mw | BandType::Sw => Function::Am,
    }
}

/// Log a fault swallowed at the tuner boundary
fn absorb<T>(result: DriverResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(_e) => {
            #[cfg(feature = "embedded")]
            defmt::warn!("Si4735 fault: {}", _e);
            None
        }
    }
}

impl<I2C, RST, D> Tuner for Si4735<I2C, RST, D>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
{
    fn probe_and_configure(&mut self, band_type: BandType) {
        absorb(self.probe(band_type));
    }

    fn set_bus_speed(&mut self, speed: BusSpeed) {
        // The bus clock is fixed when the peripheral is created
        self.bus_speed = speed;
    }

    fn set_fm(&mut self, range: TuneRange) {
        absorb(self.fm(range));
    }

    fn set_am(&mut self, range: TuneRange) {
        absorb(self.am(range));
    }

    fn set_ssb(&mut self, range: TuneRange, sideband: Sideband) {
        absorb(self.ssb(range, sideband));
    }

    fn set_antenna_capacitor(&mut self, mode: u16) {
        self.antenna_capacitor = mode;
    }

    fn set_agc(&mut self, disable: bool, index: u8) {
        absorb(self.agc_override(disable, index));
    }

    fn set_am_soft_mute_max_attenuation(&mut self, level: u8) {
        absorb(self.set_property(prop::AM_SOFT_MUTE_MAX_ATTENUATION, u16::from(level)));
    }

    fn set_ssb_avc(&mut self, enable: bool) {
        let value = if enable { SSB_MODE_AVCEN } else { 0 };
        absorb(self.update_ssb_mode(SSB_MODE_AVCEN, value));
    }

    fn set_ssb_soft_mute_max_attenuation(&mut self, level: u8) {
        // Same property id in the patched SSB firmware
        absorb(self.set_property(prop::AM_SOFT_MUTE_MAX_ATTENUATION, u16::from(level)));
    }

    fn set_ssb_audio_bandwidth(&mut self, index: u8) {
        absorb(self.update_ssb_mode(0x000F, u16::from(index)));
    }

    fn set_sideband_cutoff_filter(&mut self, mode: u8) {
        absorb(self.update_ssb_mode(0x00F0, u16::from(mode) << 4));
    }

    fn set_ssb_config(&mut self, config: SsbConfig) {
        self.ssb_mode = config.as_property();
        absorb(self.set_property(prop::SSB_MODE, self.ssb_mode));
    }

    fn set_am_bandwidth(&mut self, index: u8, line_filter: bool) {
        let value = u16::from(index & 0x0F) | (u16::from(line_filter) << 8);
        absorb(self.set_property(prop::AM_CHANNEL_FILTER, value));
    }

    fn set_frequency_step(&mut self, step: u16) {
        self.range.step = step;
        let spacing = match self.function {
            Some(Function::Fm) => prop::FM_SEEK_FREQ_SPACING,
            _ => prop::AM_SEEK_FREQ_SPACING,
        };
        absorb(self.set_property(spacing, step));
    }

    fn frequency_up(&mut self) {
        self.range = self.range.step_up();
        absorb(self.tune());
    }

    fn frequency_down(&mut self) {
        self.range = self.range.step_down();
        absorb(self.tune());
    }

    fn frequency(&mut self) -> u16 {
        absorb(self.tune_status()).map_or(self.range.current, |status| status.frequency)
    }

    fn seek_station_up(&mut self) {
        absorb(self.seek_up());
    }

    fn set_fm_stereo(&mut self, enable: bool) {
        let (stereo, mono) = if enable { BLEND_STEREO } else { BLEND_MONO_ONLY };
        absorb(
            self.set_property(prop::FM_BLEND_RSSI_STEREO_THRESHOLD, stereo)
                .and_then(|()| self.set_property(prop::FM_BLEND_RSSI_MONO_THRESHOLD, mono)),
        );
    }

    fn volume_up(&mut self) {
        if self.volume < MAX_VOLUME {
            absorb(self.set_volume(self.volume + 1));
        }
    }

    fn volume_down(&mut self) {
        if self.volume > 0 {
            absorb(self.set_volume(self.volume - 1));
        }
    }

    fn volume(&mut self) -> u8 {
        self.volume
    }

    fn set_bfo(&mut self, offset_hz: i16) {
        absorb(self.set_property(prop::SSB_BFO, u16::from_be_bytes(offset_hz.to_be_bytes())));
    }

    fn reset(&mut self) {
        self.hardware_reset();
    }

    fn query_library_id(&mut self) {
        let _library = absorb(self.library_id());

        #[cfg(feature = "embedded")]
        defmt::debug!("Library id {}", _library);
    }

    fn patch_power_up(&mut self) {
        absorb(self.power_up_patch());
    }

    fn download_patch(&mut self, patch: &[u8]) {
        absorb(self.write_patch(patch));
    }

    fn refresh_signal_quality(&mut self) {
        absorb(self.signal_quality());
    }

    fn rssi(&mut self) -> u8 {
        self.rssi
    }

    fn snr(&mut self) -> u8 {
        self.snr
    }
}
