//! Configuration schema types for `msprite.toml`
//!
//! Every section is optional; missing keys fall back to the display defaults.

use crate::output::Tones;
use crate::overlay::DebugColors;
use image::Rgba;
use serde::{Deserialize, Serialize};

/// An RGBA color written as `[r, g, b, a]`.
pub type ColorValue = [u8; 4];

/// PNG rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Color of lit pixels
    #[serde(default = "default_foreground")]
    pub foreground: ColorValue,
    /// Color of unlit pixels
    #[serde(default = "default_background")]
    pub background: ColorValue,
    /// Integer upscale factor
    #[serde(default = "default_scale")]
    pub scale: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            foreground: default_foreground(),
            background: default_background(),
            scale: default_scale(),
        }
    }
}

impl RenderConfig {
    pub fn tones(&self) -> Tones {
        Tones { foreground: Rgba(self.foreground), background: Rgba(self.background) }
    }
}

fn default_foreground() -> ColorValue {
    [255, 255, 255, 255]
}

fn default_background() -> ColorValue {
    [0, 0, 0, 0]
}

fn default_scale() -> u8 {
    1
}

/// Collision overlay colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Bounding box outline
    #[serde(default = "default_bounds")]
    pub bounds: ColorValue,
    /// Bounding box intersection fill
    #[serde(default = "default_intersection")]
    pub intersection: ColorValue,
    /// Colliding pixel fill
    #[serde(default = "default_pixel")]
    pub pixel: ColorValue,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { bounds: default_bounds(), intersection: default_intersection(), pixel: default_pixel() }
    }
}

impl DebugConfig {
    pub fn colors(&self) -> DebugColors {
        DebugColors {
            bounds: Rgba(self.bounds),
            intersection: Rgba(self.intersection),
            pixel: Rgba(self.pixel),
        }
    }
}

fn default_bounds() -> ColorValue {
    DebugColors::default().bounds.0
}

fn default_intersection() -> ColorValue {
    DebugColors::default().intersection.0
}

fn default_pixel() -> ColorValue {
    DebugColors::default().pixel.0
}

/// Decoding settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Treat warnings as errors
    #[serde(default)]
    pub strict: bool,
}

/// Complete msprite.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspriteConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msprite.toml: '{}' {}", self.field, self.message)
    }
}

impl MspriteConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.render.scale == 0 {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }
}
