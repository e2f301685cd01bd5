//! Data models for decoded sprite literals (bytes, dimensions, metadata)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from an array initializer.
///
/// Tokens that fail to parse are kept in place as `Malformed` so callers can
/// detect broken input downstream instead of silently losing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawByte {
    Value(u8),
    Malformed(String),
}

impl RawByte {
    /// The byte value, or `None` for malformed tokens.
    pub fn value(&self) -> Option<u8> {
        match self {
            RawByte::Value(v) => Some(*v),
            RawByte::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RawByte::Malformed(_))
    }
}

/// Sprite dimensions, either read from an annotation or guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dimensions {
    /// Read verbatim from a `WxH` or `WxHxF` comment. `frames == 0` means
    /// a still image.
    Explicit { width: u32, height: u32, frames: u32 },
    /// Derived from a `w:` hint and the byte count. Height is always a
    /// multiple of 8, and 0 when no width was declared.
    Inferred { width: Option<u32>, height: u32 },
}

impl Dimensions {
    /// Infer dimensions for column-packed data of `byte_count` bytes.
    pub fn infer(width: Option<u32>, byte_count: usize) -> Self {
        let height = match width {
            Some(w) if w > 0 => {
                let pages = byte_count / w as usize;
                u32::try_from(pages.saturating_mul(8)).unwrap_or(u32::MAX)
            }
            _ => 0,
        };
        Dimensions::Inferred { width, height }
    }

    pub fn width(&self) -> Option<u32> {
        match self {
            Dimensions::Explicit { width, .. } => Some(*width),
            Dimensions::Inferred { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Dimensions::Explicit { height, .. } | Dimensions::Inferred { height, .. } => *height,
        }
    }

    /// Number of animation frames; 0 means "single image".
    pub fn frame_count(&self) -> u32 {
        match self {
            Dimensions::Explicit { frames, .. } => *frames,
            Dimensions::Inferred { .. } => 0,
        }
    }

    /// True when the dimensions were guessed rather than annotated.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Dimensions::Inferred { .. })
    }
}

/// Everything the metadata parser learned about one sprite literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteMetadata {
    /// Array name from the declaration, when there is one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub raw_bytes: Vec<RawByte>,
    /// Width from a `w:` hint, kept even when an annotation overrides it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub declared_width: Option<u32>,
    pub dimensions: Dimensions,
}

impl SpriteMetadata {
    pub fn width(&self) -> Option<u32> {
        self.dimensions.width()
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height()
    }

    pub fn frame_count(&self) -> u32 {
        self.dimensions.frame_count()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.dimensions.is_ambiguous()
    }

    /// Number of tokens that did not parse as a byte.
    pub fn malformed_count(&self) -> usize {
        self.raw_bytes.iter().filter(|b| b.is_malformed()).count()
    }

    /// Byte at `index`, reading malformed and missing bytes as 0.
    pub fn byte_or_zero(&self, index: usize) -> u8 {
        self.raw_bytes.get(index).and_then(RawByte::value).unwrap_or(0)
    }
}

/// A non-fatal problem found while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
