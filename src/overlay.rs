//! Debug overlay for visualizing collision checks
//!
//! A small RGBA canvas with canvas-style drawing state: a stroke and a fill
//! tone, pushed and popped with [`DebugOverlay::save`] and
//! [`DebugOverlay::restore`]. [`DebugOverlay::scoped`] wraps that pair in a
//! guard so the state is restored on every exit path.

use crate::raster::Rect;
use image::{Pixel, Rgba, RgbaImage};
use std::ops::{Deref, DerefMut};

/// Current drawing tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawState {
    pub stroke: Rgba<u8>,
    pub fill: Rgba<u8>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self { stroke: Rgba([255, 255, 255, 255]), fill: Rgba([255, 255, 255, 255]) }
    }
}

/// Tones used when drawing a collision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugColors {
    /// Outline of each sprite's bounding box.
    pub bounds: Rgba<u8>,
    /// Fill of the bounding-box intersection.
    pub intersection: Rgba<u8>,
    /// Each colliding pixel.
    pub pixel: Rgba<u8>,
}

impl Default for DebugColors {
    fn default() -> Self {
        Self {
            bounds: Rgba([0, 200, 0, 77]),
            intersection: Rgba([200, 0, 0, 128]),
            pixel: Rgba([255, 255, 0, 255]),
        }
    }
}

/// Canvas that collision checks draw onto.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    canvas: RgbaImage,
    /// World position of the canvas's top-left pixel.
    origin: (i64, i64),
    state: DrawState,
    saved: Vec<DrawState>,
}

impl DebugOverlay {
    /// A transparent overlay of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    /// Draw on top of an existing image.
    pub fn from_image(canvas: RgbaImage) -> Self {
        Self { canvas, origin: (0, 0), state: DrawState::default(), saved: Vec::new() }
    }

    /// Place the canvas's top-left pixel at world position `(x, y)`.
    ///
    /// Drawing calls take world coordinates, so a canvas can cover any
    /// region without reaching back to the world origin.
    pub fn with_origin(mut self, x: i64, y: i64) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn set_stroke(&mut self, color: Rgba<u8>) {
        self.state.stroke = color;
    }

    pub fn set_fill(&mut self, color: Rgba<u8>) {
        self.state.fill = color;
    }

    /// Push the current drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    /// Pop the last saved drawing state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Save now and restore when the returned guard is dropped.
    pub fn scoped(&mut self) -> OverlayScope<'_> {
        self.save();
        OverlayScope { overlay: self }
    }

    /// Outline `rect` one pixel wide in the stroke tone.
    pub fn stroke_rect(&mut self, rect: Rect) {
        if rect.width <= 0 || rect.height <= 0 {
            return;
        }
        let color = self.state.stroke;
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

        for x in left..=right {
            self.blend(x, top, color);
            if bottom != top {
                self.blend(x, bottom, color);
            }
        }
        for y in top + 1..bottom {
            self.blend(left, y, color);
            if right != left {
                self.blend(right, y, color);
            }
        }
    }

    /// Fill `rect` in the fill tone.
    pub fn fill_rect(&mut self, rect: Rect) {
        let color = self.state.fill;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.blend(x, y, color);
            }
        }
    }

    /// Fill a single pixel in the fill tone.
    pub fn fill_pixel(&mut self, x: i64, y: i64) {
        let color = self.state.fill;
        self.blend(x, y, color);
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        let (x, y) = (x - self.origin.0, y - self.origin.1);
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        self.canvas.get_pixel_mut(x as u32, y as u32).blend(&color);
    }
}

/// Guard returned by [`DebugOverlay::scoped`].
pub struct OverlayScope<'a> {
    overlay: &'a mut DebugOverlay,
}

impl Deref for OverlayScope<'_> {
    type Target = DebugOverlay;

    fn deref(&self) -> &DebugOverlay {
        self.overlay
    }
}

impl DerefMut for OverlayScope<'_> {
    fn deref_mut(&mut self) -> &mut DebugOverlay {
        self.overlay
    }
}

impl Drop for OverlayScope<'_> {
    fn drop(&mut self) {
        self.overlay.restore();
    }
}
