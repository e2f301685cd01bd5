//! Pixel-exact collision detection between positioned surfaces
//!
//! Two phases: an O(1) bounding-box test that rejects most pairs, then a
//! monochrome AND over the overlapping region only. A pixel collides when
//! both surfaces are opaque there; colour plays no part.

use crate::error::CollisionError;
use crate::overlay::{DebugColors, DebugOverlay};
use crate::raster::{RasterSurface, Rect};
use rayon::prelude::*;

/// Outcome of a collision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    /// Final answer: bounding-box overlap, or pixel overlap when precise.
    pub hit: bool,
    /// Overlap of the two bounding boxes, in world coordinates.
    pub intersection: Option<Rect>,
    /// Positions where both surfaces are opaque. Always 0 for
    /// bounding-box-only checks.
    pub colliding_pixels: usize,
}

/// A surface at a top-left world position.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub surface: &'a RasterSurface,
    pub x: i32,
    pub y: i32,
}

impl<'a> Placed<'a> {
    pub fn new(surface: &'a RasterSurface, x: i32, y: i32) -> Self {
        Self { surface, x, y }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x as i64,
            self.y as i64,
            self.surface.width() as i64,
            self.surface.height() as i64,
        )
    }
}

/// Check whether two surfaces overlap.
///
/// With `precise` set, bounding-box overlap is refined to actual opaque
/// pixel overlap. Zero-sized surfaces are rejected before anything else.
///
/// # Examples
///
/// ```
/// use microsprite::collision::detect_collision;
/// use microsprite::raster::RasterSurface;
///
/// let a = RasterSurface::filled(4, 4);
/// let b = RasterSurface::filled(4, 4);
/// assert!(detect_collision(&a, 0, 0, &b, 2, 2, true).unwrap());
/// assert!(!detect_collision(&a, 0, 0, &b, 10, 10, true).unwrap());
/// ```
pub fn detect_collision(
    a: &RasterSurface,
    xa: i32,
    ya: i32,
    b: &RasterSurface,
    xb: i32,
    yb: i32,
    precise: bool,
) -> Result<bool, CollisionError> {
    check_collision(a, xa, ya, b, xb, yb, precise).map(|report| report.hit)
}

/// Like [`detect_collision`], returning the full report.
pub fn check_collision(
    a: &RasterSurface,
    xa: i32,
    ya: i32,
    b: &RasterSurface,
    xb: i32,
    yb: i32,
    precise: bool,
) -> Result<CollisionReport, CollisionError> {
    run(Placed::new(a, xa, ya), Placed::new(b, xb, yb), precise, None)
}

/// Check many independent pairs in parallel.
///
/// Results are in pair order. No overlay is drawn.
pub fn detect_collisions(
    pairs: &[(Placed<'_>, Placed<'_>)],
    precise: bool,
) -> Result<Vec<bool>, CollisionError> {
    pairs
        .par_iter()
        .map(|(a, b)| run(*a, *b, precise, None).map(|report| report.hit))
        .collect()
}

/// Collision checker that can draw each check onto a debug overlay.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    overlay: Option<DebugOverlay>,
    colors: DebugColors,
}

impl CollisionDetector {
    /// A detector without an overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw bounding boxes, intersections and colliding pixels onto `overlay`.
    pub fn with_debug_overlay(overlay: DebugOverlay) -> Self {
        Self { overlay: Some(overlay), colors: DebugColors::default() }
    }

    pub fn with_colors(mut self, colors: DebugColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn overlay(&self) -> Option<&DebugOverlay> {
        self.overlay.as_ref()
    }

    pub fn into_overlay(self) -> Option<DebugOverlay> {
        self.overlay
    }

    pub fn check(
        &mut self,
        a: &RasterSurface,
        xa: i32,
        ya: i32,
        b: &RasterSurface,
        xb: i32,
        yb: i32,
        precise: bool,
    ) -> Result<CollisionReport, CollisionError> {
        let colors = self.colors;
        let debug = self.overlay.as_mut().map(|overlay| (overlay, colors));
        run(Placed::new(a, xa, ya), Placed::new(b, xb, yb), precise, debug)
    }

    pub fn detect(
        &mut self,
        a: &RasterSurface,
        xa: i32,
        ya: i32,
        b: &RasterSurface,
        xb: i32,
        yb: i32,
        precise: bool,
    ) -> Result<bool, CollisionError> {
        self.check(a, xa, ya, b, xb, yb, precise).map(|report| report.hit)
    }
}

fn validate(surface: &RasterSurface) -> Result<(), CollisionError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(CollisionError::InvalidGeometry {
            width: surface.width(),
            height: surface.height(),
        });
    }
    Ok(())
}

fn run(
    a: Placed<'_>,
    b: Placed<'_>,
    precise: bool,
    debug: Option<(&mut DebugOverlay, DebugColors)>,
) -> Result<CollisionReport, CollisionError> {
    validate(a.surface)?;
    validate(b.surface)?;

    let bounds_a = a.bounds();
    let bounds_b = b.bounds();
    let intersection = bounds_a.intersection(&bounds_b);

    let mut scope = debug.map(|(overlay, colors)| (overlay.scoped(), colors));
    if let Some((overlay, colors)) = scope.as_mut() {
        overlay.set_stroke(colors.bounds);
        overlay.stroke_rect(bounds_a);
        overlay.stroke_rect(bounds_b);
        if let Some(rect) = intersection {
            overlay.set_fill(colors.intersection);
            overlay.fill_rect(rect);
        }
    }

    let Some(rect) = intersection else {
        return Ok(CollisionReport { hit: false, intersection: None, colliding_pixels: 0 });
    };
    if !precise {
        return Ok(CollisionReport { hit: true, intersection, colliding_pixels: 0 });
    }

    let local = |placed: &Placed<'_>| {
        Rect::new(rect.x - placed.x as i64, rect.y - placed.y as i64, rect.width, rect.height)
    };
    let sample_a = a.surface.sample_region(local(&a));
    let sample_b = b.surface.sample_region(local(&b));

    if let Some((overlay, colors)) = scope.as_mut() {
        overlay.set_fill(colors.pixel);
    }

    let mut colliding_pixels = 0;
    for (i, (&pa, &pb)) in sample_a.opaque.iter().zip(&sample_b.opaque).enumerate() {
        if pa && pb {
            colliding_pixels += 1;
            if let Some((overlay, _)) = scope.as_mut() {
                let width = sample_a.width;
                overlay.fill_pixel(rect.x + (i % width) as i64, rect.y + (i / width) as i64);
            }
        }
    }

    Ok(CollisionReport { hit: colliding_pixels > 0, intersection, colliding_pixels })
}
