//! SSB patch loader
//!
//! The chip only demodulates SSB after a firmware patch has been streamed
//! into its RAM. The command order and the settle delays in between are
//! fixed; the chip has no status bit that says it is ready.

use embedded_hal::delay::DelayNs;

use crate::config::{PATCH_DOWNLOAD_SETTLE_MS, PATCH_POWER_UP_SETTLE_MS, SSB_CONFIG_SETTLE_MS};
use crate::tuner::Tuner;
use crate::types::SsbConfig;

/// Opaque SSB patch content, passed to the chip untouched
#[derive(Clone, Copy, Debug)]
pub struct SsbPatch {
    content: &'static [u8],
}

impl SsbPatch {
    /// Wrap the patch bytes
    #[must_use]
    pub const fn new(content: &'static [u8]) -> Self {
        Self { content }
    }

    /// Patch bytes
    #[must_use]
    pub const fn content(&self) -> &'static [u8] {
        self.content
    }

    /// Patch length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if no patch was supplied
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Load the SSB patch and apply the SSB configuration
///
/// Sequence: reset, library id query, patch power-up, settle, download,
/// settle, SSB config with `bandwidth_index`, settle.
pub fn load_ssb_patch<T: Tuner, D: DelayNs>(
    tuner: &mut T,
    delay: &mut D,
    patch: &SsbPatch,
    bandwidth_index: u8,
) {
    #[cfg(feature = "embedded")]
    defmt::info!("Loading SSB patch ({} bytes)", patch.len());

    tuner.reset();
    tuner.query_library_id();
    tuner.patch_power_up();
    delay.delay_ms(PATCH_POWER_UP_SETTLE_MS);
    tuner.download_patch(patch.content());
    delay.delay_ms(PATCH_DOWNLOAD_SETTLE_MS);
    tuner.set_ssb_config(SsbConfig::for_bandwidth(bandwidth_index));
    delay.delay_ms(SSB_CONFIG_SETTLE_MS);
}
