//! CLI dispatch for the `msprite inspect` command.
//!
//! Shows what the metadata parser made of a source file: name, geometry,
//! byte counts, warnings and a text preview of the first frame.

use std::path::Path;
use std::process::ExitCode;

use crate::loader::{LoadResult, SpriteLoader};
use crate::models::{Dimensions, SpriteMetadata};
use crate::parser::decode_metadata;
use crate::provider::{OPAQUE, TRANSPARENT};
use crate::raster::RasterSurface;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the inspect command.
///
/// Metadata is printed even when the sprite cannot be decoded; the decode
/// error is reported alongside it and the command exits with an error.
pub fn run_inspect(input: &Path, json: bool) -> ExitCode {
    let source = match std::fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let loaded = SpriteLoader::new().load(&source);
    let (metadata, warnings) = match &loaded {
        Ok(result) => (result.sprite.metadata().clone(), result.warnings.clone()),
        Err(_) => {
            let parsed = decode_metadata(&source);
            (parsed.metadata, parsed.warnings)
        }
    };

    if json {
        let output = serde_json::json!({
            "file": input.display().to_string(),
            "metadata": metadata,
            "width": loaded.as_ref().ok().map(|r| r.sprite.width()),
            "height": loaded.as_ref().ok().map(|r| r.sprite.height()),
            "frames": loaded.as_ref().ok().map(|r| r.sprite.frames().len()),
            "opaque_pixels": loaded.as_ref().ok().map(opaque_pixels),
            "warnings": warnings.iter().map(|w| w.message.as_str()).collect::<Vec<_>>(),
            "error": loaded.as_ref().err().map(|e| e.to_string()),
        });
        println!("{:#}", output);
    } else {
        print_metadata_text(input, &metadata);
        match &loaded {
            Ok(result) => print_sprite_text(result),
            Err(e) => println!("  decode:     failed ({})", e),
        }
        for warning in &warnings {
            eprintln!("Warning: {}: {}", input.display(), warning);
        }
    }

    match loaded {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn opaque_pixels(result: &LoadResult) -> usize {
    result.sprite.frames().iter().map(RasterSurface::opaque_count).sum()
}

fn print_metadata_text(input: &Path, metadata: &SpriteMetadata) {
    println!("{}", input.display());
    println!("  id:         {}", metadata.id.as_deref().unwrap_or("(anonymous)"));

    let dims = match metadata.dimensions {
        Dimensions::Explicit { width, height, frames: 0 } => format!("{}x{} (annotated)", width, height),
        Dimensions::Explicit { width, height, frames } => {
            format!("{}x{}x{} (annotated)", width, height, frames)
        }
        Dimensions::Inferred { width: Some(width), height } => format!("{}x{} (inferred)", width, height),
        Dimensions::Inferred { width: None, .. } => "unknown".to_string(),
    };
    println!("  dimensions: {}", dims);
    println!("  bytes:      {} ({} malformed)", metadata.raw_bytes.len(), metadata.malformed_count());
}

fn print_sprite_text(result: &LoadResult) {
    let sprite = &result.sprite;
    println!("  frames:     {}", sprite.frames().len());
    println!("  opaque:     {}", opaque_pixels(result));

    if let Some(first) = sprite.frame(0) {
        println!();
        for y in 0..first.height() {
            let row: String = (0..first.width())
                .map(|x| if first.is_opaque(x, y) { OPAQUE } else { TRANSPARENT })
                .collect();
            println!("  {}", row);
        }
    }
}
