//! Built-in 5x7 glyph set
//!
//! The classic column-packed font shipped with small monochrome displays,
//! decoded through the regular sprite pipeline into 256 glyph frames indexed
//! by character code.

use crate::error::DecodeError;
use crate::loader::{load_sprite, Sprite};
use crate::raster::RasterSurface;
use std::sync::OnceLock;

/// Source text of the built-in font, as a PROGMEM array literal.
pub const FONT_SOURCE: &str = include_str!("../assets/font5x7.h");

/// Glyph width in pixels.
pub const GLYPH_WIDTH: u32 = 5;

/// Glyph height in pixels.
pub const GLYPH_HEIGHT: u32 = 7;

static FONT: OnceLock<Result<Sprite, DecodeError>> = OnceLock::new();

/// The decoded built-in font, one frame per character code.
///
/// Decoded once and shared afterwards.
pub fn builtin_font() -> Result<&'static Sprite, DecodeError> {
    FONT.get_or_init(|| load_sprite(FONT_SOURCE)).as_ref().map_err(Clone::clone)
}

/// Glyph for `ch` in `font`, for characters in the 8-bit range.
pub fn glyph(font: &Sprite, ch: char) -> Option<&RasterSurface> {
    let code = u8::try_from(u32::from(ch)).ok()?;
    font.frame(code as usize)
}
