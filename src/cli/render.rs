//! CLI dispatch for the `msprite render` command.

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::loader::Sprite;
use crate::output::{generate_output_path, save_png, scale_image, surface_to_rgba};
use crate::spritesheet::render_spritesheet;

use super::{decode_file, print_warnings, resolve_config, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the render command.
///
/// Still sprites become a single image, animations a sprite sheet with
/// `cols` frames per row.
pub fn run_render(
    input: &Path,
    output: Option<&Path>,
    scale: Option<u8>,
    cols: Option<u32>,
    strict: bool,
) -> ExitCode {
    let overrides = CliOverrides { scale, strict: strict.then_some(true) };
    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = match decode_file(input, config.decode.strict) {
        Ok(result) => result,
        Err(code) => return code,
    };

    let tones = config.render.tones();
    let image = match &result.sprite {
        Sprite::Single { surface, .. } => surface_to_rgba(surface, &tones),
        Sprite::Animated { frames, .. } => render_spritesheet(frames, cols, &tones),
    };
    let image = scale_image(image, config.render.scale);

    let output_path = generate_output_path(input, output);
    if let Err(e) = save_png(&image, &output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", output_path.display());
    print_warnings(input, &result.warnings);

    ExitCode::from(EXIT_SUCCESS)
}
