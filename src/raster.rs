//! Monochrome raster surfaces and mask rasterization

use crate::error::DecodeError;
use crate::provider::{PixelMask, OPAQUE};
use image::{GrayImage, Luma};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Luminance written for opaque pixels.
pub const FOREGROUND: u8 = 255;

/// Axis-aligned rectangle in surface or world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Overlap of two rectangles, or `None` when they only touch or miss.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Rect { x, y, width, height })
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> i64 {
        self.width.max(0) * self.height.max(0)
    }
}

/// Opacity view of a surface, built the first time it is sampled.
#[derive(Debug)]
struct SamplingContext {
    width: usize,
    opaque: Vec<bool>,
}

impl SamplingContext {
    fn new(image: &GrayImage) -> Self {
        Self {
            width: image.width() as usize,
            opaque: image.pixels().map(|p| p.0[0] > 0).collect(),
        }
    }
}

/// Opacity values of a rectangular region, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSample {
    pub width: usize,
    pub height: usize,
    pub opaque: Vec<bool>,
}

/// An immutable monochrome image.
///
/// Pixels are stored as luminance; anything non-zero is opaque. The only
/// interior mutability is the sampling context used by collision checks,
/// created at most once and then reused for the surface's lifetime.
pub struct RasterSurface {
    image: GrayImage,
    context: OnceLock<SamplingContext>,
    samples: AtomicUsize,
}

impl RasterSurface {
    /// Wrap a luminance image.
    pub fn from_image(image: GrayImage) -> Self {
        Self { image, context: OnceLock::new(), samples: AtomicUsize::new(0) }
    }

    /// A fully transparent surface.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::from_image(GrayImage::new(width, height))
    }

    /// A fully opaque surface.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_image(GrayImage::from_pixel(width, height, Luma([FOREGROUND])))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Luminance at `(x, y)`; 0 outside the surface.
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        if x < self.width() && y < self.height() {
            self.image.get_pixel(x, y).0[0]
        } else {
            0
        }
    }

    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        self.luminance(x, y) > 0
    }

    /// Number of opaque pixels.
    pub fn opaque_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] > 0).count()
    }

    /// Read the opacity of `region` (surface coordinates).
    ///
    /// Creates the sampling context on first use. Positions outside the
    /// surface read as transparent. Every call bumps [`Self::samples_taken`].
    pub fn sample_region(&self, region: Rect) -> RegionSample {
        self.samples.fetch_add(1, Ordering::Relaxed);
        let context = self.context.get_or_init(|| SamplingContext::new(&self.image));

        let width = region.width.max(0) as usize;
        let height = region.height.max(0) as usize;
        let (surface_w, surface_h) = (self.width() as i64, self.height() as i64);

        let mut opaque = Vec::with_capacity(width * height);
        for y in region.y..region.y + height as i64 {
            for x in region.x..region.x + width as i64 {
                let inside = x >= 0 && y >= 0 && x < surface_w && y < surface_h;
                opaque.push(inside && context.opaque[y as usize * context.width + x as usize]);
            }
        }

        RegionSample { width, height, opaque }
    }

    /// How many times this surface has been sampled.
    pub fn samples_taken(&self) -> usize {
        self.samples.load(Ordering::Relaxed)
    }

    /// Whether the sampling context has been created yet.
    pub fn has_sampling_context(&self) -> bool {
        self.context.get().is_some()
    }
}

impl Clone for RasterSurface {
    /// Copies the pixels; the clone starts with a fresh sampling context.
    fn clone(&self) -> Self {
        Self::from_image(self.image.clone())
    }
}

impl PartialEq for RasterSurface {
    fn eq(&self, other: &Self) -> bool {
        self.image == other.image
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("sampled", &self.samples_taken())
            .finish()
    }
}

/// Rasterize a textual pixel mask.
///
/// Rows are separated by whitespace, so blank lines and indentation are
/// ignored. Width is the longest row; shorter rows are transparent past
/// their end. Every `#` becomes a [`FOREGROUND`] pixel.
///
/// # Examples
///
/// ```
/// use microsprite::raster::rasterize;
///
/// let surface = rasterize("#.\n.#").unwrap();
/// assert_eq!((surface.width(), surface.height()), (2, 2));
/// assert!(surface.is_opaque(0, 0));
/// assert!(!surface.is_opaque(1, 0));
/// ```
pub fn rasterize(mask: &str) -> Result<RasterSurface, DecodeError> {
    let rows: Vec<&str> = mask.split_whitespace().collect();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if rows.is_empty() || width == 0 {
        return Err(DecodeError::EmptyMask);
    }

    let mut image = GrayImage::new(width as u32, rows.len() as u32);
    for (y, row) in rows.iter().enumerate() {
        for (x, px) in row.chars().enumerate() {
            if px == OPAQUE {
                image.put_pixel(x as u32, y as u32, Luma([FOREGROUND]));
            }
        }
    }

    Ok(RasterSurface::from_image(image))
}

/// Rasterize a provider mask.
pub fn rasterize_mask(mask: &PixelMask) -> Result<RasterSurface, DecodeError> {
    rasterize(mask.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_hash_is_fully_opaque() {
        let mask = "####\n####\n####";
        let surface = rasterize(mask).unwrap();
        assert_eq!((surface.width(), surface.height()), (4, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert!(surface.is_opaque(x, y));
                assert_eq!(surface.luminance(x, y), FOREGROUND);
            }
        }
    }

    #[test]
    fn test_non_hash_is_transparent() {
        let surface = rasterize("..x\n-o_").unwrap();
        assert_eq!(surface.opaque_count(), 0);
    }

    #[test]
    fn test_whitespace_between_rows_is_not_a_row() {
        let surface = rasterize("\n\t  #.\r\n\n   .#  \n\n").unwrap();
        assert_eq!(surface.height(), 2);
        assert_eq!(surface.width(), 2);
        assert!(surface.is_opaque(0, 0));
        assert!(surface.is_opaque(1, 1));
    }

    #[test]
    fn test_irregular_rows() {
        let surface = rasterize("#\n###\n.#").unwrap();
        assert_eq!(surface.width(), 3);
        assert!(surface.is_opaque(0, 0));
        assert!(!surface.is_opaque(1, 0));
        assert!(surface.is_opaque(2, 1));
        assert!(surface.is_opaque(1, 2));
        assert!(!surface.is_opaque(2, 2));
    }

    #[test]
    fn test_empty_mask_is_an_error() {
        assert_eq!(rasterize("").unwrap_err(), DecodeError::EmptyMask);
        assert_eq!(rasterize(" \n\t ").unwrap_err(), DecodeError::EmptyMask);
    }

    #[test]
    fn test_out_of_bounds_query_is_transparent() {
        let surface = RasterSurface::filled(2, 2);
        assert!(!surface.is_opaque(2, 0));
        assert!(!surface.is_opaque(0, 5));
    }

    #[test]
    fn test_sampling_context_is_created_once() {
        let surface = rasterize("##\n#.").unwrap();
        assert!(!surface.has_sampling_context());
        assert_eq!(surface.samples_taken(), 0);

        let first = surface.sample_region(Rect::new(0, 0, 2, 2));
        assert!(surface.has_sampling_context());
        assert_eq!(first.opaque, vec![true, true, true, false]);

        let second = surface.sample_region(Rect::new(1, 1, 1, 1));
        assert_eq!(second.opaque, vec![false]);
        assert_eq!(surface.samples_taken(), 2);
    }

    #[test]
    fn test_sample_region_clips_to_surface() {
        let surface = RasterSurface::filled(2, 2);
        let sample = surface.sample_region(Rect::new(1, -1, 2, 2));
        assert_eq!(sample.width, 2);
        assert_eq!(sample.height, 2);
        assert_eq!(sample.opaque, vec![false, false, true, false]);
    }

    #[test]
    fn test_clone_has_fresh_context() {
        let surface = RasterSurface::filled(1, 1);
        surface.sample_region(Rect::new(0, 0, 1, 1));
        let copy = surface.clone();
        assert_eq!(copy, surface);
        assert!(!copy.has_sampling_context());
        assert_eq!(copy.samples_taken(), 0);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(b.intersection(&a), Some(Rect::new(2, 2, 2, 2)));

        // Touching edges do not overlap
        assert_eq!(a.intersection(&Rect::new(4, 0, 2, 2)), None);
        assert_eq!(a.intersection(&Rect::new(10, 10, 4, 4)), None);
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(-2, 3, 4, 4);
        let b = Rect::new(5, -1, 2, 2);
        assert_eq!(a.union(&b), Rect::new(-2, -1, 9, 8));
        assert_eq!(a.union(&a), a);
    }
}
