//! System configuration and hardware constants
//!
//! Compile-time constants for the receiver hardware and its timing.
//! Pin mappings, bus addresses, intervals and the fixed settle delays the
//! tuner needs are centralized here.

/// System clock frequency (STM32G474 @ 170MHz)
pub const SYSTEM_CLOCK_HZ: u32 = 170_000_000;

/// I2C bus frequency shared by the tuner and the display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Si4735 I2C address with SEN tied low
pub const TUNER_I2C_ADDR: u8 = 0x11;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Minimum time between two button scan passes
pub const BUTTON_SCAN_INTERVAL_MS: u32 = 100;

/// Interval between signal quality reads
pub const SIGNAL_POLL_INTERVAL_MS: u32 = 900;

/// Period of the foreground polling loop
pub const LOOP_PERIOD_MS: u64 = 5;

/// How long the splash screen stays up
pub const SPLASH_DURATION_MS: u64 = 1500;

/// Volume programmed at power-up (0-63)
pub const DEFAULT_VOLUME: u8 = 45;

/// Highest volume the tuner accepts
pub const MAX_VOLUME: u8 = 63;

/// BFO step used when BFO adjustment starts
pub const DEFAULT_BFO_STEP_HZ: i16 = 25;

/// Alternate BFO step selected by the step button
pub const FINE_BFO_STEP_HZ: i16 = 10;

/// Lower edge of the MW band in kHz; AM frequencies below it display as LW
pub const MW_LOWER_EDGE_KHZ: u16 = 520;

/// Settle time after power-up before the first band is applied
pub const STARTUP_SETTLE_MS: u32 = 300;

/// Settle time after a band has been applied
pub const BAND_SETTLE_MS: u32 = 100;

/// Settle time after powering the tuner up in patch mode
pub const PATCH_POWER_UP_SETTLE_MS: u32 = 50;

/// Settle time after the patch download, before SSB configuration
pub const PATCH_DOWNLOAD_SETTLE_MS: u32 = 50;

/// Settle time after the SSB configuration is applied
pub const SSB_CONFIG_SETTLE_MS: u32 = 25;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic.
    //! All buttons are active low with the internal pull-up enabled.

    /// Tuner reset line
    pub const TUNER_RESET: &str = "PA8";

    /// I2C1 SCL (tuner, display)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (tuner, display)
    pub const I2C1_SDA: &str = "PB9";

    /// Encoder A input
    pub const ENCODER_A: &str = "PA0";

    /// Encoder B input
    pub const ENCODER_B: &str = "PA1";

    /// Band up button
    pub const BAND_UP: &str = "PB0";

    /// Band down button
    pub const BAND_DOWN: &str = "PB1";

    /// Mode switch button
    pub const MODE: &str = "PB2";

    /// Bandwidth button
    pub const BANDWIDTH: &str = "PB10";

    /// Step button (stereo toggle in FM)
    pub const STEP: &str = "PB11";

    /// BFO switch button (seek up in FM)
    pub const BFO: &str = "PB12";

    /// AGC switch button
    pub const AGC: &str = "PB13";

    /// Volume up button
    pub const VOLUME_UP: &str = "PB14";

    /// Volume down button
    pub const VOLUME_DOWN: &str = "PB15";
}
