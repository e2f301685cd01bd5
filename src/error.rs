//! Error types for decoding and collision checks

use thiserror::Error;

/// A sprite literal could not be turned into any pixel mask.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No annotation and no `w:` hint, so there is nothing to lay bytes out by.
    #[error("sprite has no width: add a /*WxH*/ annotation or a w: hint")]
    MissingWidth,
    /// Width or height resolved to zero.
    #[error("sprite has non-positive dimensions {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    /// The initializer contained no bytes at all.
    #[error("sprite literal contains no bytes")]
    NoBytes,
    /// The annotated geometry is beyond what a provider will allocate.
    #[error("sprite geometry {width}x{height}x{frames} is too large to unpack")]
    TooLarge { width: u32, height: u32, frames: u32 },
    /// The pixel mask had no rows.
    #[error("pixel mask is empty")]
    EmptyMask,
    /// A provider was asked for a frame it does not have.
    #[error("frame {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },
}

/// Collision checks were asked to compare a degenerate surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("invalid surface geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}
