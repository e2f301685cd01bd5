//! Pixel-data providers: byte sequences to textual pixel masks
//!
//! A provider is the pluggable strategy that knows how a display packs
//! pixels into bytes. The loader only ever sees its output, one
//! [`PixelMask`] per frame, so other packing schemes can be swapped in
//! without touching the parser or the rasterizer.

use crate::error::DecodeError;
use crate::models::SpriteMetadata;
use std::fmt;

/// Character marking an opaque pixel in a mask.
pub const OPAQUE: char = '#';

/// Character used for transparent pixels in generated masks.
pub const TRANSPARENT: char = '.';

/// A row-oriented textual image: one line per row, `#` for opaque pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask(String);

impl PixelMask {
    /// Wrap existing mask text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build a mask from rows of opacity flags.
    pub fn from_rows<R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = bool>,
    {
        let text = rows
            .into_iter()
            .map(|row| row.into_iter().map(|on| if on { OPAQUE } else { TRANSPARENT }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-blank rows of the mask.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for PixelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Masks produced for one sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    /// A single image without animation.
    Still(PixelMask),
    /// Animation frames in playback order.
    Frames(Vec<PixelMask>),
}

impl PixelData {
    /// Number of animation frames; 0 for a still image.
    pub fn frame_count(&self) -> usize {
        match self {
            PixelData::Still(_) => 0,
            PixelData::Frames(frames) => frames.len(),
        }
    }

    /// Mask for frame `index`.
    pub fn frame(&self, index: usize) -> Result<&PixelMask, DecodeError> {
        match self {
            PixelData::Frames(frames) => frames
                .get(index)
                .ok_or(DecodeError::FrameOutOfRange { index, count: frames.len() }),
            PixelData::Still(_) => Err(DecodeError::FrameOutOfRange { index, count: 0 }),
        }
    }

    /// The mask of a still image.
    pub fn mask(&self) -> Option<&PixelMask> {
        match self {
            PixelData::Still(mask) => Some(mask),
            PixelData::Frames(_) => None,
        }
    }
}

/// Strategy that turns decoded metadata into per-frame pixel masks.
pub trait PixelDataProvider: Send + Sync {
    /// Produce the masks, or fail when no mask can be built at all.
    fn unpack(&self, metadata: &SpriteMetadata) -> Result<PixelData, DecodeError>;

    /// Number of bytes this scheme expects for `metadata`, when it knows.
    fn expected_len(&self, _metadata: &SpriteMetadata) -> Option<usize> {
        None
    }
}

/// Vertical 8-pixel column packing, as used by SSD1306-style displays.
///
/// Each byte covers one column of an 8-pixel-tall page, least significant
/// bit at the top. Pages run left to right, then top to bottom, and frames
/// follow each other. A frame is `width * ceil(height / 8)` bytes.
/// Malformed and missing bytes read as 0. Sprites larger than
/// [`MAX_PIXELS`] are rejected with [`DecodeError::TooLarge`].
///
/// # Examples
///
/// ```
/// use microsprite::models::{Dimensions, RawByte, SpriteMetadata};
/// use microsprite::provider::{ColumnPackedProvider, PixelDataProvider};
///
/// let meta = SpriteMetadata {
///     id: None,
///     raw_bytes: vec![RawByte::Value(0x01), RawByte::Value(0x02)],
///     declared_width: None,
///     dimensions: Dimensions::Explicit { width: 2, height: 2, frames: 0 },
/// };
/// let data = ColumnPackedProvider.unpack(&meta).unwrap();
/// assert_eq!(data.mask().unwrap().as_str(), "#.\n.#");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPackedProvider;

/// Largest sprite [`ColumnPackedProvider`] will unpack, counted as
/// `width * height * max(frames, 1)` pixels.
pub const MAX_PIXELS: u64 = 1 << 24;

impl ColumnPackedProvider {
    fn geometry(metadata: &SpriteMetadata) -> Result<Geometry, DecodeError> {
        if metadata.raw_bytes.is_empty() {
            return Err(DecodeError::NoBytes);
        }
        let width = metadata.width().ok_or(DecodeError::MissingWidth)?;
        let height = metadata.height();
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroDimension { width, height });
        }

        let frames = metadata.frame_count();
        let too_large = DecodeError::TooLarge { width, height, frames };
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .and_then(|p| p.checked_mul(frames.max(1) as u64))
            .ok_or_else(|| too_large.clone())?;
        if pixels > MAX_PIXELS {
            return Err(too_large);
        }

        // Bounded by MAX_PIXELS, so none of these can overflow
        let (width, height) = (width as usize, height as usize);
        Ok(Geometry { width, height, frames: frames as usize, frame_len: width * height.div_ceil(8) })
    }

    fn frame_mask(metadata: &SpriteMetadata, width: usize, height: usize, offset: usize) -> PixelMask {
        PixelMask::from_rows((0..height).map(|y| {
            let page_start = offset + (y / 8) * width;
            let bit = y % 8;
            (0..width).map(move |x| (metadata.byte_or_zero(page_start + x) >> bit) & 1 == 1)
        }))
    }
}

/// Validated frame layout.
struct Geometry {
    width: usize,
    height: usize,
    frames: usize,
    frame_len: usize,
}

impl PixelDataProvider for ColumnPackedProvider {
    fn unpack(&self, metadata: &SpriteMetadata) -> Result<PixelData, DecodeError> {
        let Geometry { width, height, frames, frame_len } = Self::geometry(metadata)?;

        match frames {
            0 => Ok(PixelData::Still(Self::frame_mask(metadata, width, height, 0))),
            frames => Ok(PixelData::Frames(
                (0..frames)
                    .map(|i| Self::frame_mask(metadata, width, height, i * frame_len))
                    .collect(),
            )),
        }
    }

    /// `width * ceil(height / 8) * max(frames, 1)`, or `None` when the width
    /// is unknown or the product does not fit in `usize`.
    fn expected_len(&self, metadata: &SpriteMetadata) -> Option<usize> {
        let width = usize::try_from(metadata.width()?).ok()?;
        let pages = usize::try_from(metadata.height().div_ceil(8)).ok()?;
        let frames = usize::try_from(metadata.frame_count().max(1)).ok()?;
        width.checked_mul(pages)?.checked_mul(frames)
    }
}
