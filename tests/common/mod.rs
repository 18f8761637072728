//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, I2c, Operation};

use ssb_receiver::tuner::Tuner;
use ssb_receiver::types::{BandType, BusSpeed, Sideband, SsbConfig, TuneRange};
use ssb_receiver::ui::{GlyphColor, GlyphDisplay, GlyphSize};

// ============================================================================
// Recording tuner
// ============================================================================

/// One observable side effect of the receiver core
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Probe(BandType),
    BusSpeed(BusSpeed),
    SetFm(TuneRange),
    SetAm(TuneRange),
    SetSsb(TuneRange, Sideband),
    AntennaCapacitor(u16),
    Agc(bool, u8),
    AmSoftMute(u8),
    SsbAvc(bool),
    SsbSoftMute(u8),
    SsbAudioBandwidth(u8),
    SidebandCutoff(u8),
    SsbConfig(SsbConfig),
    AmBandwidth(u8, bool),
    FrequencyStep(u16),
    FrequencyUp,
    FrequencyDown,
    SeekUp,
    FmStereo(bool),
    VolumeUp,
    VolumeDown,
    Bfo(i16),
    Reset,
    QueryLibraryId,
    PatchPowerUp,
    DownloadPatch(usize),
    RefreshSignal,
    Delay(u32),
}

/// Call log shared by the tuner and the delay so ordering is observable
pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Tuner double that records every command and simulates the band range,
/// the volume clamp and seeking
pub struct RecordingTuner {
    log: CallLog,
    pub range: TuneRange,
    pub volume: u8,
    pub rssi: u8,
    pub snr: u8,
    pub seek_to: Option<u16>,
}

impl RecordingTuner {
    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

/// Delay double that records millisecond waits into the call log
pub struct RecordingDelay {
    log: CallLog,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Call::Delay(ms));
    }
}

/// Tuner and delay sharing one log
pub fn recorder() -> (RecordingTuner, RecordingDelay, CallLog) {
    let log = CallLog::default();
    let tuner = RecordingTuner {
        log: Rc::clone(&log),
        range: TuneRange {
            min: 0,
            max: 0,
            current: 0,
            step: 1,
        },
        volume: 30,
        rssi: 0,
        snr: 0,
        seek_to: None,
    };
    let delay = RecordingDelay {
        log: Rc::clone(&log),
    };
    (tuner, delay, log)
}

/// Snapshot of the log
pub fn calls(log: &CallLog) -> Vec<Call> {
    log.borrow().clone()
}

/// Empty the log
pub fn clear(log: &CallLog) {
    log.borrow_mut().clear();
}

/// Number of logged calls equal to `call`
pub fn count(log: &CallLog, call: Call) -> usize {
    log.borrow().iter().filter(|&&c| c == call).count()
}

impl Tuner for RecordingTuner {
    fn probe_and_configure(&mut self, band_type: BandType) {
        self.record(Call::Probe(band_type));
    }

    fn set_bus_speed(&mut self, speed: BusSpeed) {
        self.record(Call::BusSpeed(speed));
    }

    fn set_fm(&mut self, range: TuneRange) {
        self.range = range.clamped();
        self.record(Call::SetFm(range));
    }

    fn set_am(&mut self, range: TuneRange) {
        self.range = range.clamped();
        self.record(Call::SetAm(range));
    }

    fn set_ssb(&mut self, range: TuneRange, sideband: Sideband) {
        self.range = range.clamped();
        self.record(Call::SetSsb(range, sideband));
    }

    fn set_antenna_capacitor(&mut self, mode: u16) {
        self.record(Call::AntennaCapacitor(mode));
    }

    fn set_agc(&mut self, disable: bool, index: u8) {
        self.record(Call::Agc(disable, index));
    }

    fn set_am_soft_mute_max_attenuation(&mut self, level: u8) {
        self.record(Call::AmSoftMute(level));
    }

    fn set_ssb_avc(&mut self, enable: bool) {
        self.record(Call::SsbAvc(enable));
    }

    fn set_ssb_soft_mute_max_attenuation(&mut self, level: u8) {
        self.record(Call::SsbSoftMute(level));
    }

    fn set_ssb_audio_bandwidth(&mut self, index: u8) {
        self.record(Call::SsbAudioBandwidth(index));
    }

    fn set_sideband_cutoff_filter(&mut self, mode: u8) {
        self.record(Call::SidebandCutoff(mode));
    }

    fn set_ssb_config(&mut self, config: SsbConfig) {
        self.record(Call::SsbConfig(config));
    }

    fn set_am_bandwidth(&mut self, index: u8, line_filter: bool) {
        self.record(Call::AmBandwidth(index, line_filter));
    }

    fn set_frequency_step(&mut self, step: u16) {
        self.range.step = step;
        self.record(Call::FrequencyStep(step));
    }

    fn frequency_up(&mut self) {
        self.range = self.range.step_up();
        self.record(Call::FrequencyUp);
    }

    fn frequency_down(&mut self) {
        self.range = self.range.step_down();
        self.record(Call::FrequencyDown);
    }

    fn frequency(&mut self) -> u16 {
        self.range.current
    }

    fn seek_station_up(&mut self) {
        if let Some(freq) = self.seek_to {
            self.range.current = freq;
        }
        self.record(Call::SeekUp);
    }

    fn set_fm_stereo(&mut self, enable: bool) {
        self.record(Call::FmStereo(enable));
    }

    fn volume_up(&mut self) {
        self.volume = (self.volume + 1).min(63);
        self.record(Call::VolumeUp);
    }

    fn volume_down(&mut self) {
        self.volume = self.volume.saturating_sub(1);
        self.record(Call::VolumeDown);
    }

    fn volume(&mut self) -> u8 {
        self.volume
    }

    fn set_bfo(&mut self, offset_hz: i16) {
        self.record(Call::Bfo(offset_hz));
    }

    fn reset(&mut self) {
        self.record(Call::Reset);
    }

    fn query_library_id(&mut self) {
        self.record(Call::QueryLibraryId);
    }

    fn patch_power_up(&mut self) {
        self.record(Call::PatchPowerUp);
    }

    fn download_patch(&mut self, patch: &[u8]) {
        self.record(Call::DownloadPatch(patch.len()));
    }

    fn refresh_signal_quality(&mut self) {
        self.record(Call::RefreshSignal);
    }

    fn rssi(&mut self) -> u8 {
        self.rssi
    }

    fn snr(&mut self) -> u8 {
        self.snr
    }
}

// ============================================================================
// Recording glyph display
// ============================================================================

/// One glyph display operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    Glyph {
        x: i32,
        y: i32,
        glyph: char,
        size: GlyphSize,
        color: GlyphColor,
    },
    Present,
}

/// Glyph display double that records every operation
#[derive(Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
}

impl RecordingDisplay {
    /// Glyphs drawn in `color`, in drawing order
    pub fn glyphs(&self, color: GlyphColor) -> Vec<(i32, char)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                DisplayOp::Glyph {
                    x, glyph, color: c, ..
                } if c == color => Some((x, glyph)),
                _ => None,
            })
            .collect()
    }

    /// Number of frame pushes
    pub fn presents(&self) -> usize {
        self.ops.iter().filter(|op| **op == DisplayOp::Present).count()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl GlyphDisplay for RecordingDisplay {
    fn clear(&mut self) {
        self.ops.push(DisplayOp::Clear);
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: char, size: GlyphSize, color: GlyphColor) {
        self.ops.push(DisplayOp::Glyph {
            x,
            y,
            glyph,
            size,
            color,
        });
    }

    fn present(&mut self) {
        self.ops.push(DisplayOp::Present);
    }
}

// ============================================================================
// GPIO doubles
// ============================================================================

/// Active-low input line; clones share the level
#[derive(Clone, Default)]
pub struct MockPin {
    pressed: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl DigitalErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.get())
    }
}

/// Nine button lines and handles to drive them
pub fn button_pins() -> ([MockPin; 9], [MockPin; 9]) {
    let pins: [MockPin; 9] = core::array::from_fn(|_| MockPin::default());
    let handles = pins.clone();
    (pins, handles)
}

/// Output line that records every level written
#[derive(Clone, Default)]
pub struct MockOutput {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl DigitalErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

/// Delay that returns immediately
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ============================================================================
// Scripted I2C bus
// ============================================================================

#[derive(Default)]
struct BusState {
    writes: Vec<Vec<u8>>,
    responses: Vec<(u8, Vec<u8>)>,
    last_command: u8,
    status: Option<u8>,
    fault: Option<ErrorKind>,
}

/// I2C double for the tuner
///
/// Single-byte reads return the status byte (CTS and STC set unless
/// overridden). Longer reads return the response registered for the last
/// command byte written. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedBus {
    state: Rc<RefCell<BusState>>,
}

impl ScriptedBus {
    /// Register the response read after `command`
    pub fn respond(&self, command: u8, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.responses.retain(|(c, _)| *c != command);
        state.responses.push((command, bytes.to_vec()));
    }

    /// Override the status byte
    pub fn set_status(&self, status: u8) {
        self.state.borrow_mut().status = Some(status);
    }

    /// Fail every transfer with `kind`, or stop failing
    pub fn fail_with(&self, kind: Option<ErrorKind>) {
        self.state.borrow_mut().fault = kind;
    }

    /// Every write so far
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    /// Writes whose first byte is `command`
    pub fn writes_of(&self, command: u8) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|w| w.first() == Some(&command))
            .cloned()
            .collect()
    }

    /// `SET_PROPERTY` writes as (property, value)
    pub fn properties(&self) -> Vec<(u16, u16)> {
        self.writes_of(0x12)
            .iter()
            .filter(|w| w.len() == 6)
            .map(|w| {
                (
                    u16::from_be_bytes([w[2], w[3]]),
                    u16::from_be_bytes([w[4], w[5]]),
                )
            })
            .collect()
    }

    /// Last value written to `property`
    pub fn property(&self, property: u16) -> Option<u16> {
        self.properties()
            .into_iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }
}

impl I2cErrorType for ScriptedBus {
    type Error = ErrorKind;
}

impl I2c for ScriptedBus {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if let Some(kind) = state.fault {
            return Err(kind);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    state.last_command = bytes.first().copied().unwrap_or(0);
                    state.writes.push(bytes.to_vec());
                }
                Operation::Read(buf) => {
                    let status = state.status.unwrap_or(0x81);
                    buf.fill(0);
                    if buf.len() == 1 {
                        buf[0] = status;
                    } else if let Some((_, resp)) =
                        state.responses.iter().find(|(c, _)| *c == state.last_command)
                    {
                        let n = resp.len().min(buf.len());
                        buf[..n].copy_from_slice(&resp[..n]);
                    } else if let Some(first) = buf.first_mut() {
                        *first = status;
                    }
                }
            }
        }
        Ok(())
    }
}
