//! Sprite metadata parsing from annotated byte-array literals
//!
//! Turns the cleaned literal list into bytes and works out the sprite's
//! dimensions. An explicit `/*WxH*/` or `/*WxHxF*/` comment is authoritative;
//! otherwise a `w:` hint plus the byte count gives a best-effort guess that
//! is flagged as ambiguous.

use std::fmt;

use crate::literal::extract;
use crate::models::{Dimensions, RawByte, SpriteMetadata, Warning};

/// A literal token that is not a byte.
///
/// Never returned as an `Err`: parsing keeps the token as
/// [`RawByte::Malformed`] and reports it through this type's warning text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub token: String,
    pub index: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {} '{}': {}", self.index, self.token, self.message)
    }
}

impl From<ParseError> for Warning {
    fn from(err: ParseError) -> Self {
        Warning::new(err.to_string())
    }
}

/// Result of parsing one sprite literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataResult {
    pub metadata: SpriteMetadata,
    pub warnings: Vec<Warning>,
}

/// A `WxH[xF]` annotation found in a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
}

/// Extract and parse a full source fragment in one go.
///
/// # Examples
///
/// ```
/// use microsprite::parser::decode_metadata;
///
/// let result = decode_metadata("const uint8_t bar[] PROGMEM = { /*2x8*/ 0xFF, 0x0F };");
/// let meta = result.metadata;
/// assert_eq!(meta.id.as_deref(), Some("bar"));
/// assert_eq!(meta.width(), Some(2));
/// assert_eq!(meta.height(), 8);
/// assert!(!meta.is_ambiguous());
/// ```
pub fn decode_metadata(source: &str) -> MetadataResult {
    let extracted = extract(source);
    let mut result = parse_metadata(extracted.original, &extracted.literal);
    result.metadata.id = extracted.name;
    result
}

/// Parse bytes and dimensions.
///
/// `original` is the annotated source (annotations live in its comments);
/// `literal` is the comment-free list produced by [`crate::literal`].
pub fn parse_metadata(original: &str, literal: &str) -> MetadataResult {
    let mut warnings = Vec::new();

    let raw_bytes: Vec<RawByte> = split_tokens(literal)
        .enumerate()
        .map(|(index, token)| match parse_byte(token) {
            Ok(value) => RawByte::Value(value),
            Err(message) => {
                warnings.push(ParseError { message, token: token.to_string(), index }.into());
                RawByte::Malformed(token.to_string())
            }
        })
        .collect();

    let declared_width = match find_width_hint(original) {
        Some(0) => {
            warnings.push(Warning::new("ignoring w:0 width hint"));
            None
        }
        other => other,
    };

    let dimensions = match find_annotation(original) {
        Some(annotation) => {
            if let Some(hint) = declared_width {
                if hint != annotation.width {
                    warnings.push(Warning::new(format!(
                        "w:{} hint disagrees with {}x{} annotation, using annotation",
                        hint, annotation.width, annotation.height
                    )));
                }
            }
            Dimensions::Explicit {
                width: annotation.width,
                height: annotation.height,
                frames: annotation.frames,
            }
        }
        None => {
            let dims = Dimensions::infer(declared_width, raw_bytes.len());
            let guess = match dims.width() {
                Some(w) => format!("guessed {}x{} from {} bytes", w, dims.height(), raw_bytes.len()),
                None => "no width hint either".to_string(),
            };
            warnings.push(Warning::new(format!("no WxH annotation, {}", guess)));
            dims
        }
    };

    MetadataResult {
        metadata: SpriteMetadata { id: None, raw_bytes, declared_width, dimensions },
        warnings,
    }
}

/// Parse one integer literal into a byte.
///
/// Accepts decimal, `0x` hex and `0b` binary, with optional C suffixes
/// (`u`, `l` in either case). A leading zero is still decimal.
pub fn parse_byte(token: &str) -> Result<u8, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("empty token".to_string());
    }

    let body = token.trim_end_matches(['u', 'U', 'l', 'L']);
    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (body, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err("not an integer literal".to_string());
    }

    match u32::from_str_radix(digits, radix) {
        Ok(value) => u8::try_from(value).map_err(|_| format!("value {} does not fit in a byte", value)),
        Err(_) => Err("value does not fit in a byte".to_string()),
    }
}

/// Find the first `WxH` / `WxHxF` annotation that directly follows a `//`
/// or `/*` comment opener.
pub fn find_annotation(text: &str) -> Option<Annotation> {
    let bytes = text.as_bytes();

    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] != b'/' || !matches!(bytes[i + 1], b'/' | b'*') {
            continue;
        }

        let mut scanner = Scanner { bytes, pos: i + 2 };
        scanner.skip_whitespace();
        let Some(width) = scanner.number() else { continue };
        if !scanner.eat(b'x') {
            continue;
        }
        let Some(height) = scanner.number() else { continue };
        let frames = if scanner.eat(b'x') { scanner.number().unwrap_or(0) } else { 0 };

        return Some(Annotation { width, height, frames });
    }

    None
}

/// Find a `w:` width hint (`w: 16`). The `w` must start a word.
pub fn find_width_hint(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();

    for (pos, _) in text.match_indices("w:") {
        if pos > 0 && (bytes[pos - 1].is_ascii_alphanumeric() || bytes[pos - 1] == b'_') {
            continue;
        }
        let mut scanner = Scanner { bytes, pos: pos + 2 };
        scanner.skip_whitespace();
        if let Some(width) = scanner.number() {
            return Some(width);
        }
    }

    None
}

/// Comma-separated tokens, ignoring one dangling trailing comma.
fn split_tokens(literal: &str) -> impl Iterator<Item = &str> {
    let trimmed = literal.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim_end();
    let tokens = if trimmed.is_empty() { None } else { Some(trimmed.split(',')) };
    tokens.into_iter().flatten().map(str::trim)
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos]).ok()?.parse().ok()
    }
}
