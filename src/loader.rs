//! Sprite stream loading: source text to raster surfaces
//!
//! Runs the whole decode pipeline: literal extraction, metadata parsing,
//! pixel unpacking through a [`PixelDataProvider`] and rasterization.

use crate::error::DecodeError;
use crate::literal::extract;
use crate::models::{SpriteMetadata, Warning};
use crate::parser::parse_metadata;
use crate::provider::{ColumnPackedProvider, PixelData, PixelDataProvider};
use crate::raster::{rasterize_mask, RasterSurface};
use std::slice;

/// A decoded sprite: one surface, or an ordered set of animation frames.
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Single {
        surface: RasterSurface,
        metadata: SpriteMetadata,
    },
    Animated {
        frames: Vec<RasterSurface>,
        /// Mirrors the first frame.
        width: u32,
        /// Mirrors the first frame.
        height: u32,
        metadata: SpriteMetadata,
    },
}

impl Sprite {
    /// Metadata the sprite was decoded from.
    pub fn metadata(&self) -> &SpriteMetadata {
        match self {
            Sprite::Single { metadata, .. } | Sprite::Animated { metadata, .. } => metadata,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Sprite::Single { surface, .. } => surface.width(),
            Sprite::Animated { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Sprite::Single { surface, .. } => surface.height(),
            Sprite::Animated { height, .. } => *height,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Sprite::Animated { .. })
    }

    /// All surfaces in frame order; a single image is one frame.
    pub fn frames(&self) -> &[RasterSurface] {
        match self {
            Sprite::Single { surface, .. } => slice::from_ref(surface),
            Sprite::Animated { frames, .. } => frames,
        }
    }

    /// Surface for frame `index`.
    pub fn frame(&self, index: usize) -> Option<&RasterSurface> {
        self.frames().get(index)
    }
}

/// Result of loading a sprite: the sprite plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub sprite: Sprite,
    pub warnings: Vec<Warning>,
}

/// Decodes sprite literals with a chosen pixel-data provider.
#[derive(Debug, Clone, Default)]
pub struct SpriteLoader<P = ColumnPackedProvider> {
    provider: P,
}

impl SpriteLoader {
    /// Loader using vertical column packing.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: PixelDataProvider> SpriteLoader<P> {
    /// Loader using a custom packing scheme.
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Decode a source fragment into a sprite.
    ///
    /// Malformed tokens only produce warnings. Fails with [`DecodeError`]
    /// when the provider cannot build any mask; no partial sprite is
    /// returned in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use microsprite::loader::SpriteLoader;
    ///
    /// let source = "const uint8_t blink[] PROGMEM = { /*1x8x2*/ 0xFF, 0x00 };";
    /// let result = SpriteLoader::new().load(source).unwrap();
    /// assert!(result.sprite.is_animated());
    /// assert_eq!(result.sprite.frames().len(), 2);
    /// assert!(result.sprite.frame(0).unwrap().is_opaque(0, 7));
    /// assert!(!result.sprite.frame(1).unwrap().is_opaque(0, 7));
    /// ```
    pub fn load(&self, source: &str) -> Result<LoadResult, DecodeError> {
        let extracted = extract(source);
        let parsed = parse_metadata(extracted.original, &extracted.literal);
        let mut metadata = parsed.metadata;
        let mut warnings = parsed.warnings;
        metadata.id = extracted.name;

        if let Some(expected) = self.provider.expected_len(&metadata) {
            let actual = metadata.raw_bytes.len();
            if actual != expected && !metadata.raw_bytes.is_empty() {
                warnings.push(Warning::new(format!(
                    "expected {} bytes for {}, found {}",
                    expected,
                    describe(&metadata),
                    actual
                )));
            }
        }

        let sprite = match self.provider.unpack(&metadata)? {
            PixelData::Still(mask) => {
                let surface = rasterize_mask(&mask)?;
                Sprite::Single { surface, metadata }
            }
            PixelData::Frames(masks) => {
                let frames = masks.iter().map(rasterize_mask).collect::<Result<Vec<_>, _>>()?;
                let first = frames.first().ok_or(DecodeError::FrameOutOfRange { index: 0, count: 0 })?;
                let (width, height) = (first.width(), first.height());
                Sprite::Animated { frames, width, height, metadata }
            }
        };

        Ok(LoadResult { sprite, warnings })
    }
}

/// Decode a sprite with the default provider, discarding warnings.
pub fn load_sprite(source: &str) -> Result<Sprite, DecodeError> {
    SpriteLoader::new().load(source).map(|result| result.sprite)
}

fn describe(metadata: &SpriteMetadata) -> String {
    let width = metadata.width().unwrap_or(0);
    match metadata.frame_count() {
        0 => format!("{}x{}", width, metadata.height()),
        frames => format!("{}x{}x{}", width, metadata.height(), frames),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimensions, RawByte};
    use crate::provider::PixelMask;

    #[test]
    fn test_load_single() {
        let source = "const unsigned char dot[] PROGMEM = { /*2x8*/ 0x01, 0x80 };";
        let result = SpriteLoader::new().load(source).unwrap();
        assert!(result.warnings.is_empty());

        let sprite = result.sprite;
        assert!(!sprite.is_animated());
        assert_eq!((sprite.width(), sprite.height()), (2, 8));
        assert_eq!(sprite.metadata().id.as_deref(), Some("dot"));
        let surface = sprite.frame(0).unwrap();
        assert!(surface.is_opaque(0, 0));
        assert!(surface.is_opaque(1, 7));
        assert_eq!(surface.opaque_count(), 2);
    }

    #[test]
    fn test_load_animated_mirrors_first_frame() {
        let source = "x[] = { /*3x8x2*/ 1, 2, 3, 4, 5, 6 };";
        let sprite = load_sprite(source).unwrap();
        assert!(sprite.is_animated());
        assert_eq!(sprite.frames().len(), 2);
        assert_eq!(sprite.width(), 3);
        assert_eq!(sprite.height(), 8);
        assert_eq!(sprite.metadata().frame_count(), 2);
    }

    #[test]
    fn test_load_keeps_malformed_tokens() {
        let source = "s[] = { /*2x8*/ 0xFF, bogus };";
        let result = SpriteLoader::new().load(source).unwrap();
        assert_eq!(result.sprite.metadata().raw_bytes[1], RawByte::Malformed("bogus".to_string()));
        assert!(result.warnings.iter().any(|w| w.message.contains("bogus")));
        assert!(!result.sprite.frame(0).unwrap().is_opaque(1, 0));
    }

    #[test]
    fn test_load_warns_on_length_mismatch() {
        let result = SpriteLoader::new().load("s[] = { /*4x8*/ 1, 2 };").unwrap();
        assert!(result.warnings.iter().any(|w| w.message == "expected 4 bytes for 4x8, found 2"));
    }

    #[test]
    fn test_load_fails_without_dimensions() {
        assert_eq!(load_sprite("s[] = { 1, 2, 3 };").unwrap_err(), DecodeError::MissingWidth);
        assert_eq!(load_sprite("s[] = { /*0x8*/ 1 };").unwrap_err(), DecodeError::ZeroDimension { width: 0, height: 8 });
        assert_eq!(load_sprite("// w:8\ns[] = { 1, 2 };").unwrap_err(), DecodeError::ZeroDimension { width: 8, height: 0 });
    }

    #[test]
    fn test_load_rejects_overflowing_annotation() {
        let err = SpriteLoader::new()
            .load("s[] = { /*4294967295x4294967295x4294967295*/ 1 };")
            .unwrap_err();
        assert_eq!(err, DecodeError::TooLarge { width: u32::MAX, height: u32::MAX, frames: u32::MAX });
    }

    #[test]
    fn test_load_rejects_huge_annotation_on_tiny_literal() {
        let err = load_sprite("s[] = { /*60000x60000*/ 1 };").unwrap_err();
        assert_eq!(err, DecodeError::TooLarge { width: 60000, height: 60000, frames: 0 });
    }

    #[test]
    fn test_load_fails_on_empty_literal() {
        assert_eq!(load_sprite("s[] = { };").unwrap_err(), DecodeError::NoBytes);
    }

    struct CheckerProvider;

    impl PixelDataProvider for CheckerProvider {
        fn unpack(&self, metadata: &SpriteMetadata) -> Result<PixelData, DecodeError> {
            let size = metadata.width().ok_or(DecodeError::MissingWidth)? as usize;
            Ok(PixelData::Still(PixelMask::from_rows(
                (0..size).map(|y| (0..size).map(move |x| (x + y) % 2 == 0)),
            )))
        }
    }

    #[test]
    fn test_custom_provider() {
        let loader = SpriteLoader::with_provider(CheckerProvider);
        let result = loader.load("// w:3\n s[] = { 0 };").unwrap();
        let surface = result.sprite.frame(0).unwrap();
        assert_eq!((surface.width(), surface.height()), (3, 3));
        assert!(surface.is_opaque(0, 0));
        assert!(!surface.is_opaque(1, 0));
        assert!(surface.is_opaque(1, 1));
        assert!(result.sprite.metadata().is_ambiguous());
        assert_eq!(result.sprite.metadata().dimensions, Dimensions::Inferred { width: Some(3), height: 0 });
    }
}
