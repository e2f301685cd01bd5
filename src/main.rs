//! msprite - Command-line tool for decoding monochrome sprite arrays

use std::process::ExitCode;

use microsprite::cli;

fn main() -> ExitCode {
    cli::run()
}
