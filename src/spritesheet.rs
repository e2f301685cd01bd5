//! Spritesheet rendering - lays animation frames out in a grid

use crate::output::{surface_to_rgba, Tones};
use crate::raster::RasterSurface;
use image::{imageops, RgbaImage};

/// Render frames into a spritesheet grid.
///
/// `cols` defaults to all frames in one row. Cells are sized to the largest
/// frame; smaller frames sit in the top-left corner of their cell and the
/// rest of the sheet is filled with the background tone.
///
/// # Examples
///
/// ```
/// use microsprite::output::Tones;
/// use microsprite::raster::RasterSurface;
/// use microsprite::spritesheet::render_spritesheet;
///
/// let frames = vec![RasterSurface::filled(2, 2); 4];
/// let sheet = render_spritesheet(&frames, None, &Tones::default());
/// assert_eq!(sheet.dimensions(), (8, 2));
///
/// let sheet = render_spritesheet(&frames, Some(2), &Tones::default());
/// assert_eq!(sheet.dimensions(), (4, 4));
/// ```
pub fn render_spritesheet(frames: &[RasterSurface], cols: Option<u32>, tones: &Tones) -> RgbaImage {
    if frames.is_empty() {
        return RgbaImage::from_pixel(1, 1, tones.background);
    }

    let cell_width = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let cell_height = frames.iter().map(|f| f.height()).max().unwrap_or(1);

    let count = frames.len() as u32;
    let columns = cols.unwrap_or(count).clamp(1, count);
    let rows = count.div_ceil(columns);

    let mut sheet = RgbaImage::from_pixel(columns * cell_width, rows * cell_height, tones.background);
    for (i, frame) in frames.iter().enumerate() {
        let col = (i as u32) % columns;
        let row = (i as u32) / columns;
        let tile = surface_to_rgba(frame, tones);
        imageops::replace(&mut sheet, &tile, (col * cell_width) as i64, (row * cell_height) as i64);
    }

    sheet
}
