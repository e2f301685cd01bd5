//! PNG output, tone mapping and file path generation

use crate::raster::RasterSurface;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Colors used when turning a monochrome surface into RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tones {
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
}

impl Default for Tones {
    /// White pixels on a transparent background, like the display.
    fn default() -> Self {
        Self { foreground: Rgba([255, 255, 255, 255]), background: Rgba([0, 0, 0, 0]) }
    }
}

/// Map a surface to RGBA: opaque pixels in the foreground tone, the rest
/// in the background tone.
pub fn surface_to_rgba(surface: &RasterSurface, tones: &Tones) -> RgbaImage {
    RgbaImage::from_fn(surface.width(), surface.height(), |x, y| {
        if surface.is_opaque(x, y) {
            tones.foreground
        } else {
            tones.background
        }
    })
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Keeps pixel edges crisp. A factor of 0 or 1 returns the image as is.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Generate the output path for a decoded source file.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{input_stem}.png` next to the input |
/// | `-o dir/` or an existing directory | `dir/{input_stem}.png` |
/// | `-o out.png` | `out.png` |
pub fn generate_output_path(input: &Path, output_arg: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("sprite");
    let file_name = format!("{}.png", stem);

    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(file_name)
            } else {
                output.to_path_buf()
            }
        }
        None => input.with_file_name(file_name),
    }
}
