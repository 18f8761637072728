//! OLED Display Adapter
//!
//! Glyph-level drawing on top of `embedded-graphics`. The receiver UI only
//! needs "draw this character here in this color"; [`GlyphCanvas`] turns that
//! into mono font text on any binary-color draw target.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::ui::{GlyphColor, GlyphDisplay, GlyphSize};

/// Frame buffer size in bytes (1 bit per pixel)
const BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

/// In-memory panel frame
///
/// Mirrors the SSD1306 GDDRAM layout: eight pages of 128 column bytes, bit
/// `y % 8` of each byte being one row. Host builds render the status screen
/// into it so tests can inspect what the panel would show.
pub struct DisplayBuffer {
    pages: [u8; BUFFER_LEN],
}

impl DisplayBuffer {
    /// Blank frame
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pages: [0; BUFFER_LEN],
        }
    }

    /// Page byte index and row mask of a pixel, `None` off the panel
    fn locate(x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return None;
        }
        let index = usize::try_from(y / 8 * DISPLAY_WIDTH + x).ok()?;
        Some((index, 1 << (y % 8)))
    }

    /// Light or blank one pixel; coordinates off the panel are dropped
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((index, mask)) = Self::locate(x, y) {
            if on {
                self.pages[index] |= mask;
            } else {
                self.pages[index] &= !mask;
            }
        }
    }

    /// Read a pixel; outside the panel reads as off
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        Self::locate(x, y).is_some_and(|(index, mask)| self.pages[index] & mask != 0)
    }

    /// Number of lit pixels inside a glyph cell
    #[must_use]
    pub fn lit_in(&self, x: u32, y: u32, width: u32, height: u32) -> usize {
        (y..y + height)
            .flat_map(|py| (x..x + width).map(move |px| (px, py)))
            .filter(|&(px, py)| self.pixel(px, py))
            .count()
    }

    /// Raw page bytes, in panel transfer order
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pages
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// A draw target whose frame can be pushed to a panel
pub trait FrameSink {
    /// Push the frame; targets that draw straight into memory do nothing
    fn present(&mut self);
}

impl FrameSink for DisplayBuffer {
    fn present(&mut self) {}
}

#[cfg(feature = "embedded")]
impl<DI, SIZE> FrameSink
    for ssd1306::Ssd1306<DI, SIZE, ssd1306::mode::BufferedGraphicsMode<SIZE>>
where
    DI: ssd1306::prelude::WriteOnlyDataCommand,
    SIZE: ssd1306::size::DisplaySize,
{
    fn present(&mut self) {
        if let Err(_e) = self.flush() {
            defmt::warn!("Display flush failed: {}", defmt::Debug2Format(&_e));
        }
    }
}

/// Glyph display over a binary-color draw target
pub struct GlyphCanvas<D> {
    target: D,
}

impl<D> GlyphCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameSink,
{
    /// Wrap a draw target
    pub const fn new(target: D) -> Self {
        Self { target }
    }

    /// Underlying draw target
    pub const fn target(&self) -> &D {
        &self.target
    }

    /// Release the draw target
    pub fn into_inner(self) -> D {
        self.target
    }
}

const fn font(size: GlyphSize) -> &'static MonoFont<'static> {
    match size {
        GlyphSize::Small => &FONT_6X10,
        GlyphSize::Large => &FONT_10X20,
    }
}

impl<D> GlyphDisplay for GlyphCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameSink,
{
    fn clear(&mut self) {
        let _ = self.target.clear(BinaryColor::Off);
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: char, size: GlyphSize, color: GlyphColor) {
        let color = match color {
            GlyphColor::Foreground => BinaryColor::On,
            GlyphColor::Background => BinaryColor::Off,
        };
        let mut utf8 = [0u8; 4];
        let text = glyph.encode_utf8(&mut utf8);
        let style = MonoTextStyle::new(font(size), color);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target);
    }

    fn present(&mut self) {
        self.target.present();
    }
}
