//! Receiver State Machine
//!
//! Owns the band table, the working receiver state and the status screen.
//! Input events update the state and are translated into tuner commands;
//! the screen is then refreshed from a snapshot of the state.

use embedded_hal::delay::DelayNs;

use super::band::{Band, BandTable};
use super::ssb::{load_ssb_patch, SsbPatch};
use crate::config::{
    BAND_SETTLE_MS, DEFAULT_BFO_STEP_HZ, DEFAULT_VOLUME, FINE_BFO_STEP_HZ, STARTUP_SETTLE_MS,
};
use crate::input::buttons::Button;
use crate::input::InputEvent;
use crate::tuner::Tuner;
use crate::types::{BandType, BusSpeed, Mode};
use crate::ui::format::{StatusInfo, AM_BANDWIDTHS, SSB_BANDWIDTHS};
use crate::ui::screen::{ScreenView, StatusScreen};
use crate::ui::GlyphDisplay;

/// Number of SSB audio bandwidth settings
pub const SSB_BANDWIDTH_COUNT: u8 = SSB_BANDWIDTHS.len() as u8;

/// Number of AM channel filter settings
pub const AM_BANDWIDTH_COUNT: u8 = AM_BANDWIDTHS.len() as u8;

/// Next tuning step in the 1 -> 5 -> 10 -> 1 cycle
#[must_use]
pub const fn next_tuning_step(step: u16) -> u16 {
    match step {
        1 => 5,
        5 => 10,
        _ => 1,
    }
}

/// Whether an SSB bandwidth index is 2 kHz or narrower, which needs the
/// band pass sideband filter
#[must_use]
pub const fn is_narrow_ssb_bandwidth(index: u8) -> bool {
    matches!(index, 0 | 4 | 5)
}

/// Working state of the receiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverState {
    mode: Mode,
    band_index: usize,
    frequency: u16,
    step: u16,
    bfo_offset: i16,
    bfo_step: i16,
    bfo_enabled: bool,
    ssb_patch_loaded: bool,
    bandwidth_index_ssb: u8,
    bandwidth_index_am: u8,
    agc_disabled: bool,
    agc_active: bool,
    volume: u8,
    stereo_enabled: bool,
}

impl ReceiverState {
    /// Power-on defaults: FM on band 0, step 10, BFO off, no patch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Fm,
            band_index: 0,
            frequency: 0,
            step: 10,
            bfo_offset: 0,
            bfo_step: DEFAULT_BFO_STEP_HZ,
            bfo_enabled: false,
            ssb_patch_loaded: false,
            bandwidth_index_ssb: 0,
            bandwidth_index_am: 0,
            agc_disabled: false,
            agc_active: true,
            volume: DEFAULT_VOLUME,
            stereo_enabled: true,
        }
    }

    /// Operating mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the active band
    #[must_use]
    pub const fn band_index(&self) -> usize {
        self.band_index
    }

    /// Working frequency in band units
    #[must_use]
    pub const fn frequency(&self) -> u16 {
        self.frequency
    }

    /// Working tuning step in band units
    #[must_use]
    pub const fn step(&self) -> u16 {
        self.step
    }

    /// BFO offset in Hz
    #[must_use]
    pub const fn bfo_offset(&self) -> i16 {
        self.bfo_offset
    }

    /// BFO step in Hz
    #[must_use]
    pub const fn bfo_step(&self) -> i16 {
        self.bfo_step
    }

    /// Encoder adjusts the BFO instead of the frequency
    #[must_use]
    pub const fn bfo_enabled(&self) -> bool {
        self.bfo_enabled
    }

    /// SSB patch is resident in the chip
    #[must_use]
    pub const fn ssb_patch_loaded(&self) -> bool {
        self.ssb_patch_loaded
    }

    /// SSB audio bandwidth index
    #[must_use]
    pub const fn bandwidth_index_ssb(&self) -> u8 {
        self.bandwidth_index_ssb
    }

    /// AM channel filter index
    #[must_use]
    pub const fn bandwidth_index_am(&self) -> u8 {
        self.bandwidth_index_am
    }

    /// Flag toggled by the AGC button
    #[must_use]
    pub const fn agc_disabled(&self) -> bool {
        self.agc_disabled
    }

    /// AGC state last sent to the chip
    #[must_use]
    pub const fn agc_active(&self) -> bool {
        self.agc_active
    }

    /// Volume as last read back from the tuner
    #[must_use]
    pub const fn volume(&self) -> u8 {
        self.volume
    }

    /// FM stereo blending enabled
    #[must_use]
    pub const fn stereo_enabled(&self) -> bool {
        self.stereo_enabled
    }
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ReceiverState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Receiver({}, band {}, {} step {}, bfo {}={})",
            self.mode,
            self.band_index,
            self.frequency,
            self.step,
            self.bfo_enabled,
            self.bfo_offset
        );
    }
}

/// Last signal quality reading
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalQuality {
    /// Received signal strength in dBuV
    pub rssi: u8,
    /// Signal to noise ratio in dB
    pub snr: u8,
}

/// Everything the control loop owns: bands, working state, screen caches
pub struct ReceiverContext {
    bands: BandTable,
    state: ReceiverState,
    signal: SignalQuality,
    patch: SsbPatch,
    screen: StatusScreen,
}

impl ReceiverContext {
    /// Create a context with the default band table
    #[must_use]
    pub fn new(patch: SsbPatch) -> Self {
        Self::with_bands(BandTable::default(), patch)
    }

    /// Create a context over an explicit band table
    #[must_use]
    pub const fn with_bands(bands: BandTable, patch: SsbPatch) -> Self {
        Self {
            bands,
            state: ReceiverState::new(),
            signal: SignalQuality { rssi: 0, snr: 0 },
            patch,
            screen: StatusScreen::new(),
        }
    }

    /// Working state
    #[must_use]
    pub const fn state(&self) -> &ReceiverState {
        &self.state
    }

    /// Band table
    #[must_use]
    pub const fn bands(&self) -> &BandTable {
        &self.bands
    }

    /// Active band entry
    #[must_use]
    pub fn band(&self) -> &Band {
        self.bands.get(self.state.band_index)
    }

    /// Last signal quality reading
    #[must_use]
    pub const fn signal(&self) -> SignalQuality {
        self.signal
    }

    /// Status screen caches
    #[must_use]
    pub const fn screen(&self) -> &StatusScreen {
        &self.screen
    }

    /// Bring the tuner up and tune the first band
    pub fn power_on<T: Tuner, D: DelayNs>(&mut self, tuner: &mut T, delay: &mut D) {
        tuner.probe_and_configure(BandType::Fm);
        tuner.set_bus_speed(BusSpeed::Fast);
        delay.delay_ms(STARTUP_SETTLE_MS);

        self.use_band(tuner, delay);
        self.state.volume = tuner.volume();
        self.state.frequency = tuner.frequency();

        #[cfg(feature = "embedded")]
        defmt::info!("Receiver up: {}", self.state);
    }

    /// Apply the active band to the tuner
    ///
    /// FM resets mode and drops the SSB patch. AM-family bands keep SSB
    /// when the patch is loaded and fall back to AM otherwise.
    pub fn use_band<T: Tuner, D: DelayNs>(&mut self, tuner: &mut T, delay: &mut D) {
        let band = *self.band();
        tuner.set_antenna_capacitor(band.band_type.antenna_capacitor());

        match band.band_type {
            BandType::Fm => {
                self.state.mode = Mode::Fm;
                tuner.set_fm(band.tune_range());
                tuner.set_fm_stereo(self.state.stereo_enabled);
                self.state.bfo_enabled = false;
                self.state.ssb_patch_loaded = false;
            }
            BandType::Lw | BandType::Mw | BandType::Sw => {
                match (self.state.ssb_patch_loaded, self.state.mode.sideband()) {
                    (true, Some(sideband)) => {
                        tuner.set_ssb(band.tune_range(), sideband);
                        tuner.set_ssb_avc(true);
                        tuner.set_ssb_soft_mute_max_attenuation(0);
                    }
                    _ => {
                        self.state.mode = Mode::Am;
                        tuner.set_am(band.tune_range());
                        tuner.set_agc(false, 0);
                        self.state.agc_active = true;
                        tuner.set_am_soft_mute_max_attenuation(0);
                        self.state.bfo_enabled = false;
                    }
                }
            }
        }
        delay.delay_ms(BAND_SETTLE_MS);

        let band = *self.band();
        self.state.frequency = band.current_freq;
        self.state.step = band.current_step;

        #[cfg(feature = "embedded")]
        defmt::info!("Band {}: {} {}", self.state.band_index, band, self.state.mode);
    }

    /// Handle one input event
    pub fn handle<T: Tuner, D: DelayNs>(&mut self, event: InputEvent, tuner: &mut T, delay: &mut D) {
        #[cfg(feature = "embedded")]
        defmt::debug!("Event {}", event);

        match event {
            InputEvent::Rotate(delta) => self.rotate(delta, tuner),
            InputEvent::Press(Button::BandUp) => self.band_up(tuner, delay),
            InputEvent::Press(Button::BandDown) => self.band_down(tuner, delay),
            InputEvent::Press(Button::Mode) => self.switch_mode(tuner, delay),
            InputEvent::Press(Button::Bandwidth) => self.cycle_bandwidth(tuner),
            InputEvent::Press(Button::Step) => self.cycle_step(tuner),
            InputEvent::Press(Button::Bfo) => self.switch_bfo(tuner),
            InputEvent::Press(Button::Agc) => self.switch_agc(tuner),
            InputEvent::Press(Button::VolumeUp) => {
                tuner.volume_up();
                self.state.volume = tuner.volume();
            }
            InputEvent::Press(Button::VolumeDown) => {
                tuner.volume_down();
                self.state.volume = tuner.volume();
            }
        }
    }

    /// Save the working position and move to the next band
    pub fn band_up<T: Tuner, D: DelayNs>(&mut self, tuner: &mut T, delay: &mut D) {
        self.remember_band();
        self.state.band_index = self.bands.next_index(self.state.band_index);
        self.use_band(tuner, delay);
    }

    /// Save the working position and move to the previous band
    pub fn band_down<T: Tuner, D: DelayNs>(&mut self, tuner: &mut T, delay: &mut D) {
        self.remember_band();
        self.state.band_index = self.bands.prev_index(self.state.band_index);
        self.use_band(tuner, delay);
    }

    /// Cycle AM -> LSB -> USB -> AM; FM ignores the button
    ///
    /// Entering LSB from AM loads the SSB patch. Every change re-applies the
    /// band so the tuner is reconfigured for the new demodulator.
    pub fn switch_mode<T: Tuner, D: DelayNs>(&mut self, tuner: &mut T, delay: &mut D) {
        self.state.mode = match self.state.mode {
            Mode::Fm => return,
            Mode::Am => {
                load_ssb_patch(tuner, delay, &self.patch, self.state.bandwidth_index_ssb);
                self.state.ssb_patch_loaded = true;
                Mode::Lsb
            }
            Mode::Lsb => Mode::Usb,
            Mode::Usb => {
                self.state.ssb_patch_loaded = false;
                self.state.bfo_enabled = false;
                Mode::Am
            }
        };
        self.remember_band();
        self.use_band(tuner, delay);
    }

    /// Step to the next filter bandwidth of the current mode
    pub fn cycle_bandwidth<T: Tuner>(&mut self, tuner: &mut T) {
        match self.state.mode {
            Mode::Lsb | Mode::Usb => {
                let index = (self.state.bandwidth_index_ssb + 1) % SSB_BANDWIDTH_COUNT;
                self.state.bandwidth_index_ssb = index;
                tuner.set_ssb_audio_bandwidth(index);
                tuner.set_sideband_cutoff_filter(u8::from(!is_narrow_ssb_bandwidth(index)));
            }
            Mode::Am => {
                let index = (self.state.bandwidth_index_am + 1) % AM_BANDWIDTH_COUNT;
                self.state.bandwidth_index_am = index;
                tuner.set_am_bandwidth(index, true);
            }
            Mode::Fm => {}
        }
    }

    /// Step button: stereo in FM, BFO step with BFO on, tuning step otherwise
    pub fn cycle_step<T: Tuner>(&mut self, tuner: &mut T) {
        match self.state.mode {
            Mode::Fm => {
                self.state.stereo_enabled = !self.state.stereo_enabled;
                tuner.set_fm_stereo(self.state.stereo_enabled);
            }
            Mode::Lsb | Mode::Usb if self.state.bfo_enabled => {
                self.state.bfo_step = if self.state.bfo_step == DEFAULT_BFO_STEP_HZ {
                    FINE_BFO_STEP_HZ
                } else {
                    DEFAULT_BFO_STEP_HZ
                };
            }
            Mode::Lsb | Mode::Usb | Mode::Am => {
                self.state.step = next_tuning_step(self.state.step);
                tuner.set_frequency_step(self.state.step);
                self.bands.get_mut(self.state.band_index).current_step = self.state.step;
            }
        }
    }

    /// BFO button: toggles BFO adjustment in SSB, seeks up in FM
    pub fn switch_bfo<T: Tuner>(&mut self, tuner: &mut T) {
        match self.state.mode {
            Mode::Lsb | Mode::Usb => self.state.bfo_enabled = !self.state.bfo_enabled,
            Mode::Fm => {
                tuner.seek_station_up();
                self.state.frequency = tuner.frequency();
            }
            Mode::Am => {}
        }
    }

    /// AGC button
    ///
    /// The toggled "disabled" flag is sent as the chip's AGC enable, so the
    /// chip AGC is on while the flag reads disabled. Kept as shipped.
    pub fn switch_agc<T: Tuner>(&mut self, tuner: &mut T) {
        self.state.agc_disabled = !self.state.agc_disabled;
        tuner.set_agc(!self.state.agc_disabled, 0);
        self.state.agc_active = self.state.agc_disabled;
    }

    /// Apply `delta` encoder detents to the BFO or the frequency
    pub fn rotate<T: Tuner>(&mut self, delta: i32, tuner: &mut T) {
        if delta == 0 {
            return;
        }

        if self.state.bfo_enabled {
            let offset = i32::from(self.state.bfo_offset)
                .saturating_add(delta.saturating_mul(i32::from(self.state.bfo_step)));
            self.state.bfo_offset = i16::try_from(offset).unwrap_or(if offset < 0 {
                i16::MIN
            } else {
                i16::MAX
            });
            tuner.set_bfo(self.state.bfo_offset);
        } else {
            for _ in 0..delta.unsigned_abs() {
                if delta > 0 {
                    tuner.frequency_up();
                } else {
                    tuner.frequency_down();
                }
            }
            self.state.frequency = tuner.frequency();
        }
    }

    /// Read signal quality; returns whether the RSSI changed
    pub fn poll_signal<T: Tuner>(&mut self, tuner: &mut T) -> bool {
        tuner.refresh_signal_quality();
        let rssi = tuner.rssi();
        let snr = tuner.snr();
        let changed = rssi != self.signal.rssi;
        self.signal = SignalQuality { rssi, snr };
        changed
    }

    /// Snapshot of what the status screen shows
    #[must_use]
    pub fn view(&self) -> ScreenView {
        let state = &self.state;
        ScreenView {
            band_type: self.band().band_type,
            mode: state.mode,
            frequency: state.frequency,
            bfo_enabled: state.bfo_enabled,
            bfo_offset: state.bfo_offset,
            bfo_step: state.bfo_step,
            volume: state.volume,
            rssi: self.signal.rssi,
            status: StatusInfo {
                mode: state.mode,
                step: state.step,
                ssb_bandwidth: state.bandwidth_index_ssb,
                am_bandwidth: state.bandwidth_index_am,
                stereo: state.stereo_enabled,
                agc_active: state.agc_active,
            },
        }
    }

    /// Redraw the changed parts of the status screen
    pub fn render<G: GlyphDisplay>(&mut self, display: &mut G) -> bool {
        let view = self.view();
        self.screen.refresh(&view, display)
    }

    /// Clear the panel and draw the full status screen
    pub fn redraw<G: GlyphDisplay>(&mut self, display: &mut G) {
        self.screen.reset(display);
        let view = self.view();
        self.screen.refresh(&view, display);
    }

    fn remember_band(&mut self) {
        self.bands
            .remember(self.state.band_index, self.state.frequency, self.state.step);
    }
}
