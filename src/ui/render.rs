//! Differential Text Renderer
//!
//! Redraws only the glyph cells whose character changed. A full field
//! redraw flickers on the OLED and costs a bus transfer per glyph.

use heapless::String;

use super::{GlyphColor, GlyphDisplay, GlyphSize};

/// Capacity of a cached field
pub const FIELD_CAPACITY: usize = 24;

/// Text of a single display field
pub type FieldText = String<FIELD_CAPACITY>;

/// Draw the difference between `old` and `new` at (`x`, `y`)
///
/// Changed cells are erased in the background color and redrawn in the
/// foreground color. Extra trailing glyphs of `new` are drawn, extra
/// trailing glyphs of `old` are erased. Returns the number of cells touched.
pub fn render_diff<G: GlyphDisplay>(
    display: &mut G,
    x: i32,
    y: i32,
    size: GlyphSize,
    spacing: i32,
    old: &str,
    new: &str,
) -> usize {
    let mut touched = 0;
    let mut old_chars = old.chars();
    let mut new_chars = new.chars();
    let mut col = x;

    loop {
        match (old_chars.next(), new_chars.next()) {
            (Some(o), Some(n)) => {
                if o != n {
                    display.draw_glyph(col, y, o, size, GlyphColor::Background);
                    display.draw_glyph(col, y, n, size, GlyphColor::Foreground);
                    touched += 1;
                }
            }
            (None, Some(n)) => {
                display.draw_glyph(col, y, n, size, GlyphColor::Foreground);
                touched += 1;
            }
            (Some(o), None) => {
                display.draw_glyph(col, y, o, size, GlyphColor::Background);
                touched += 1;
            }
            (None, None) => break,
        }
        col += spacing;
    }

    touched
}

/// A positioned display field with the text last drawn into it
#[derive(Clone, Debug)]
pub struct Field {
    x: i32,
    y: i32,
    size: GlyphSize,
    spacing: i32,
    drawn: FieldText,
}

impl Field {
    /// Create an empty field using the font's natural advance
    #[must_use]
    pub const fn new(x: i32, y: i32, size: GlyphSize) -> Self {
        Self::with_spacing(x, y, size, size.advance())
    }

    /// Create an empty field with an explicit glyph spacing
    #[must_use]
    pub const fn with_spacing(x: i32, y: i32, size: GlyphSize, spacing: i32) -> Self {
        Self {
            x,
            y,
            size,
            spacing,
            drawn: String::new(),
        }
    }

    /// Render `text` over the cached content and remember it
    pub fn update<G: GlyphDisplay>(&mut self, display: &mut G, text: &str) -> usize {
        let touched = render_diff(
            display,
            self.x,
            self.y,
            self.size,
            self.spacing,
            &self.drawn,
            text,
        );
        self.drawn.clear();
        // Fields are formatted into FieldText, so this never truncates
        let _ = self.drawn.push_str(text);
        touched
    }

    /// Forget the cached content, e.g. after the display was cleared
    pub fn invalidate(&mut self) {
        self.drawn.clear();
    }

    /// Text currently on the display
    #[must_use]
    pub fn drawn(&self) -> &str {
        &self.drawn
    }
}
