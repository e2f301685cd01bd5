//! CLI dispatch for the `msprite collide` command.

use std::path::Path;
use std::process::ExitCode;

use image::{imageops, RgbaImage};

use crate::collision::{CollisionDetector, CollisionReport, Placed};
use crate::config::{CliOverrides, MspriteConfig};
use crate::loader::LoadResult;
use crate::output::{save_png, scale_image, surface_to_rgba, Tones};
use crate::overlay::DebugOverlay;
use crate::raster::RasterSurface;

use super::{
    decode_file, print_warnings, resolve_config, Position, EXIT_ERROR, EXIT_INVALID_ARGS,
    EXIT_SUCCESS,
};

/// Execute the collide command.
///
/// Each operand is `(source file, position, frame index)`.
pub fn run_collide(
    a: (&Path, Position, usize),
    b: (&Path, Position, usize),
    bbox_only: bool,
    debug: Option<&Path>,
    strict: bool,
) -> ExitCode {
    let overrides = CliOverrides { strict: strict.then_some(true), ..Default::default() };
    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let loaded_a = match decode_file(a.0, config.decode.strict) {
        Ok(result) => result,
        Err(code) => return code,
    };
    let loaded_b = match decode_file(b.0, config.decode.strict) {
        Ok(result) => result,
        Err(code) => return code,
    };

    let (surface_a, surface_b) = match (select_frame(a.0, &loaded_a, a.2), select_frame(b.0, &loaded_b, b.2)) {
        (Some(sa), Some(sb)) => (sa, sb),
        _ => return ExitCode::from(EXIT_INVALID_ARGS),
    };

    let placed_a = Placed::new(surface_a, a.1.x, a.1.y);
    let placed_b = Placed::new(surface_b, b.1.x, b.1.y);

    let mut detector = match debug {
        Some(_) => match backdrop(placed_a, placed_b, &config) {
            Ok(overlay) => {
                CollisionDetector::with_debug_overlay(overlay).with_colors(config.debug.colors())
            }
            Err(message) => {
                eprintln!("Error: {}", message);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => CollisionDetector::new(),
    };

    let report = match detector.check(surface_a, a.1.x, a.1.y, surface_b, b.1.x, b.1.y, !bbox_only) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    print_report(&report, bbox_only);

    if let (Some(path), Some(overlay)) = (debug, detector.into_overlay()) {
        let image = scale_image(overlay.into_image(), config.render.scale);
        if let Err(e) = save_png(&image, path) {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", path.display());
    }

    print_warnings(a.0, &loaded_a.warnings);
    print_warnings(b.0, &loaded_b.warnings);

    ExitCode::from(EXIT_SUCCESS)
}

fn select_frame<'a>(path: &Path, loaded: &'a LoadResult, index: usize) -> Option<&'a RasterSurface> {
    let frame = loaded.sprite.frame(index);
    if frame.is_none() {
        eprintln!(
            "Error: {}: frame {} out of range ({} frame{})",
            path.display(),
            index,
            loaded.sprite.frames().len(),
            if loaded.sprite.frames().len() == 1 { "" } else { "s" }
        );
    }
    frame
}

/// Largest debug canvas the CLI will allocate, in pixels.
const MAX_CANVAS_PIXELS: u64 = 1 << 24;

/// Canvas spanning the union of both bounding boxes, with the sprites drawn
/// in the render tones. The overlay origin is the union's top-left corner.
fn backdrop(a: Placed<'_>, b: Placed<'_>, config: &MspriteConfig) -> Result<DebugOverlay, String> {
    let area = a.bounds().union(&b.bounds());
    let (width, height) = (area.width as u64, area.height as u64);
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        return Err(format!(
            "debug canvas {}x{} is too large ({} pixel limit); place the sprites closer together",
            width, height, MAX_CANVAS_PIXELS
        ));
    }

    let mut render = config.render.tones();
    render.background = Tones::default().background;

    let mut canvas = RgbaImage::from_pixel(width as u32, height as u32, image::Rgba(config.render.background));
    for p in [a, b] {
        let tile = surface_to_rgba(p.surface, &render);
        imageops::overlay(&mut canvas, &tile, p.x as i64 - area.x, p.y as i64 - area.y);
    }
    Ok(DebugOverlay::from_image(canvas).with_origin(area.x, area.y))
}

fn print_report(report: &CollisionReport, bbox_only: bool) {
    match (report.hit, report.intersection) {
        (true, Some(overlap)) if bbox_only => println!(
            "collision: bounding boxes overlap by {}x{} at ({}, {})",
            overlap.width, overlap.height, overlap.x, overlap.y
        ),
        (true, Some(overlap)) => println!(
            "collision: {} pixel{} in {}x{} overlap at ({}, {})",
            report.colliding_pixels,
            if report.colliding_pixels == 1 { "" } else { "s" },
            overlap.width,
            overlap.height,
            overlap.x,
            overlap.y
        ),
        _ => println!("no collision"),
    }
}
