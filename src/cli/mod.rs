//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod collide;
mod inspect;
mod render;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, MspriteConfig};
use crate::loader::{LoadResult, SpriteLoader};
use crate::models::Warning;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// A world position given as `X,Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Parse `X,Y` into a [`Position`]. Coordinates may be negative.
pub fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|_| format!("invalid x coordinate '{}'", x.trim()))?;
    let y = y.trim().parse::<i32>().map_err(|_| format!("invalid y coordinate '{}'", y.trim()))?;
    Ok(Position { x, y })
}

/// msprite - Decode column-packed monochrome sprites, render them and test collisions
#[derive(Parser)]
#[command(name = "msprite")]
#[command(about = "msprite - Decode column-packed monochrome sprites, render them and test collisions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a sprite source file and write it to PNG
    Render {
        /// Source file containing a byte array initializer
        input: PathBuf,

        /// Output file or directory.
        /// If omitted: {input}.png next to the input
        /// If directory (ends with /): dir/{input}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-128, default from msprite.toml or 1)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=128))]
        scale: Option<u8>,

        /// Frames per row when rendering an animation as a sprite sheet
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        cols: Option<u32>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Print the decoded metadata of a sprite source file
    Inspect {
        /// Source file containing a byte array initializer
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Test two positioned sprites for collision
    Collide {
        /// First sprite source file
        a: PathBuf,

        /// Second sprite source file
        b: PathBuf,

        /// Position of the first sprite (e.g. --at-a 0,0)
        #[arg(long, value_name = "X,Y", value_parser = parse_position, allow_hyphen_values = true)]
        at_a: Position,

        /// Position of the second sprite (e.g. --at-b 3,-2)
        #[arg(long, value_name = "X,Y", value_parser = parse_position, allow_hyphen_values = true)]
        at_b: Position,

        /// Animation frame of the first sprite
        #[arg(long, default_value = "0")]
        frame_a: usize,

        /// Animation frame of the second sprite
        #[arg(long, default_value = "0")]
        frame_b: usize,

        /// Stop at the bounding-box test
        #[arg(long)]
        bbox_only: bool,

        /// Write a debug overlay PNG of the check
        #[arg(long, value_name = "PNG")]
        debug: Option<PathBuf>,

        /// Strict mode: treat decode warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { input, output, scale, cols, strict } => {
            render::run_render(&input, output.as_deref(), scale, cols, strict)
        }
        Commands::Inspect { input, json } => inspect::run_inspect(&input, json),
        Commands::Collide { a, b, at_a, at_b, frame_a, frame_b, bbox_only, debug, strict } => {
            collide::run_collide(
                (&a, at_a, frame_a),
                (&b, at_b, frame_b),
                bbox_only,
                debug.as_deref(),
                strict,
            )
        }
    }
}

/// Load msprite.toml (discovered from the working directory) and apply CLI
/// overrides. Prints the error and returns the exit code on failure.
pub(crate) fn resolve_config(overrides: &CliOverrides) -> Result<MspriteConfig, ExitCode> {
    let mut config = match load_config(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

/// Read and decode one source file.
///
/// In strict mode any warning is fatal and reported as an error.
pub(crate) fn decode_file(path: &Path, strict: bool) -> Result<LoadResult, ExitCode> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    let result = match SpriteLoader::new().load(&source) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    if strict && !result.warnings.is_empty() {
        for warning in &result.warnings {
            eprintln!("Error: {}: {}", path.display(), warning);
        }
        return Err(ExitCode::from(EXIT_ERROR));
    }

    Ok(result)
}

/// Print lenient-mode warnings to stderr.
pub(crate) fn print_warnings(path: &Path, warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}: {}", path.display(), warning);
    }
}
