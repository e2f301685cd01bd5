//! microsprite - Decoding and collision testing for column-packed monochrome sprites
//!
//! This library provides functionality to:
//! - Pull byte array literals out of C-like source text and parse their metadata
//! - Unpack column-packed bytes into pixel masks and raster surfaces
//! - Test positioned surfaces for bounding-box and pixel-exact collisions
//! - Render sprites and sprite sheets to PNG
//! - Support both lenient and strict error modes

pub mod cli;
pub mod collision;
pub mod config;
pub mod error;
pub mod font;
pub mod literal;
pub mod loader;
pub mod models;
pub mod output;
pub mod overlay;
pub mod parser;
pub mod provider;
pub mod raster;
pub mod spritesheet;
