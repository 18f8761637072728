//! User Interface
//!
//! Status screen layout, field formatting and the differential text
//! renderer. Drawing goes through [`GlyphDisplay`], so the same code runs
//! against the OLED and against test doubles.

pub mod format;
pub mod render;
pub mod screen;

/// Glyph font size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphSize {
    /// 6x10 font for labels
    Small,
    /// 10x20 font for the frequency
    Large,
}

impl GlyphSize {
    /// Horizontal advance in pixels
    #[must_use]
    pub const fn advance(self) -> i32 {
        match self {
            Self::Small => 6,
            Self::Large => 11,
        }
    }
}

/// Glyph color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphColor {
    /// Lit pixels
    Foreground,
    /// Background; drawing a glyph in it erases that glyph
    Background,
}

/// Display capable of drawing single glyphs at pixel positions
pub trait GlyphDisplay {
    /// Blank the whole frame
    fn clear(&mut self);

    /// Draw `glyph` with its top-left corner at (`x`, `y`)
    fn draw_glyph(&mut self, x: i32, y: i32, glyph: char, size: GlyphSize, color: GlyphColor);

    /// Push the frame to the panel
    fn present(&mut self);
}
