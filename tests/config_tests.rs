//! Configuration Tests
//!
//! Sanity checks on compile-time constants, the band table and the shared
//! type encodings.

use ssb_receiver::config::{
    pins, BAND_SETTLE_MS, BUTTON_SCAN_INTERVAL_MS, DEFAULT_BFO_STEP_HZ, DEFAULT_VOLUME,
    DISPLAY_HEIGHT, DISPLAY_I2C_ADDR, DISPLAY_WIDTH, MAX_VOLUME, MW_LOWER_EDGE_KHZ,
    SIGNAL_POLL_INTERVAL_MS, STARTUP_SETTLE_MS, TUNER_I2C_ADDR,
};
use ssb_receiver::radio::band::{Band, BandTable, BAND_COUNT, DEFAULT_BANDS};
use ssb_receiver::types::{BandType, BusSpeed, Mode, Sideband, SsbConfig, TuneRange};
use ssb_receiver::ui::format::{AM_BANDWIDTHS, SSB_BANDWIDTHS};

// ============================================================================
// Constant Tests
// ============================================================================

#[test]
fn bus_addresses() {
    assert_eq!(TUNER_I2C_ADDR, 0x11);
    assert_eq!(DISPLAY_I2C_ADDR, 0x3C);
}

#[test]
fn display_geometry() {
    assert_eq!(DISPLAY_WIDTH, 128);
    assert_eq!(DISPLAY_HEIGHT, 64);
}

#[test]
fn timing_constants() {
    assert_eq!(BUTTON_SCAN_INTERVAL_MS, 100);
    assert_eq!(SIGNAL_POLL_INTERVAL_MS, 900);
    assert_eq!(STARTUP_SETTLE_MS, 300);
    assert_eq!(BAND_SETTLE_MS, 100);
}

#[test]
fn volume_and_bfo_defaults() {
    assert_eq!(DEFAULT_VOLUME, 45);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);
    assert_eq!(MAX_VOLUME, 63);
    assert_eq!(DEFAULT_BFO_STEP_HZ, 25);
}

#[test]
fn button_pins_are_distinct() {
    let lines = [
        pins::BAND_UP,
        pins::BAND_DOWN,
        pins::MODE,
        pins::BANDWIDTH,
        pins::STEP,
        pins::BFO,
        pins::AGC,
        pins::VOLUME_UP,
        pins::VOLUME_DOWN,
        pins::ENCODER_A,
        pins::ENCODER_B,
        pins::TUNER_RESET,
    ];
    for (i, a) in lines.iter().enumerate() {
        for b in &lines[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// ============================================================================
// Band Table Tests
// ============================================================================

#[test]
fn default_table_layout() {
    assert_eq!(DEFAULT_BANDS.len(), BAND_COUNT);
    assert_eq!(DEFAULT_BANDS[0].band_type, BandType::Fm);
    assert_eq!(DEFAULT_BANDS[1].band_type, BandType::Lw);
    assert_eq!(DEFAULT_BANDS[2].band_type, BandType::Mw);
    assert!(DEFAULT_BANDS[3..]
        .iter()
        .all(|b| b.band_type == BandType::Sw));
}

#[test]
fn default_bands_are_consistent() {
    for band in &DEFAULT_BANDS {
        assert!(band.min_freq < band.max_freq, "{band:?}");
        assert!(band.contains(band.current_freq), "{band:?}");
        assert!(matches!(band.current_step, 1 | 5 | 10), "{band:?}");
    }
}

#[test]
fn lw_ends_below_mw_edge() {
    assert!(DEFAULT_BANDS[1].max_freq < MW_LOWER_EDGE_KHZ);
    assert_eq!(DEFAULT_BANDS[2].min_freq, MW_LOWER_EDGE_KHZ);
}

#[test]
fn table_navigation_wraps() {
    let table = BandTable::default();
    assert_eq!(table.len(), BAND_COUNT);
    assert!(!table.is_empty());
    assert_eq!(table.next_index(BAND_COUNT - 1), 0);
    assert_eq!(table.prev_index(0), BAND_COUNT - 1);
    assert_eq!(table.next_index(4), 5);
}

#[test]
fn table_remembers_position() {
    let mut table = BandTable::new(DEFAULT_BANDS);
    table.remember(2, 999, 1);
    assert_eq!(table.get(2).current_freq, 999);
    assert_eq!(table.get(2).current_step, 1);
    assert_eq!(table.get(3), &DEFAULT_BANDS[3]);
}

#[test]
fn band_tune_range() {
    let band = Band::new(BandType::Sw, 6800, 7800, 7200, 5);
    assert_eq!(
        band.tune_range(),
        TuneRange {
            min: 6800,
            max: 7800,
            current: 7200,
            step: 5,
        }
    );
}

// ============================================================================
// Type Encoding Tests
// ============================================================================

#[test]
fn mode_labels_and_sidebands() {
    assert_eq!(Mode::default(), Mode::Fm);
    assert_eq!(Mode::Lsb.label(), "LSB");
    assert_eq!(Mode::Am.label(), "AM ");
    assert_eq!(Mode::Lsb.sideband(), Some(Sideband::Lower));
    assert_eq!(Mode::Usb.sideband(), Some(Sideband::Upper));
    assert_eq!(Mode::Am.sideband(), None);
    assert!(Mode::Usb.is_ssb());
    assert!(!Mode::Fm.is_ssb());
}

#[test]
fn band_type_units_and_capacitor() {
    assert_eq!(BandType::Fm.unit(), "MHz");
    assert_eq!(BandType::Lw.unit(), "KHz");
    assert_eq!(BandType::Sw.antenna_capacitor(), 1);
    assert_eq!(BandType::Mw.antenna_capacitor(), 0);
}

#[test]
fn bus_speed_clock() {
    assert_eq!(BusSpeed::default(), BusSpeed::Standard);
    assert_eq!(BusSpeed::Fast.as_hz(), 400_000);
}

#[test]
fn tune_range_stepping() {
    let range = TuneRange {
        min: 100,
        max: 510,
        current: 505,
        step: 10,
    };
    assert_eq!(range.step_up().current, 510);
    assert_eq!(range.step_up().step_up().current, 100);
    assert_eq!(
        TuneRange {
            current: 105,
            ..range
        }
        .step_down()
        .current,
        100
    );
    assert_eq!(
        TuneRange {
            current: 100,
            ..range
        }
        .step_down()
        .current,
        510
    );
    assert_eq!(TuneRange { current: 50, ..range }.clamped().current, 100);
}

#[test]
fn ssb_config_property() {
    assert_eq!(SsbConfig::for_bandwidth(0).as_property(), 0x9010);
    assert_eq!(SsbConfig::for_bandwidth(3).as_property(), 0x9013);
}

#[test]
fn bandwidth_label_tables() {
    assert_eq!(SSB_BANDWIDTHS.len(), 6);
    assert_eq!(AM_BANDWIDTHS.len(), 7);
}
