//! Array-initializer extraction from embedded C source text
//!
//! Sprite data arrives as a fragment like
//!
//! ```text
//! const unsigned char PROGMEM hero[] = { /*8x8*/ 0x3C, 0x42, ... };
//! ```
//!
//! This module removes comments without shifting byte offsets and pulls out
//! the comma-separated contents of the first `= { ... }` (or `= [ ... ]`)
//! block. Both passes are lenient and never fail.

/// Result of pulling the literal list out of a source fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    /// The untouched input, still carrying annotations in comments.
    pub original: &'a str,
    /// Comment-free, whitespace-collapsed initializer contents.
    pub literal: String,
    /// Array name from the declaration, if one precedes the initializer.
    pub name: Option<String>,
}

/// Strip comments, then extract the initializer contents and array name.
///
/// # Examples
///
/// ```
/// use microsprite::literal::extract;
///
/// let src = "const uint8_t dot[] = { /*1x8*/ 0x01,\n  0x02 };";
/// let extracted = extract(src);
/// assert_eq!(extracted.literal, "0x01, 0x02");
/// assert_eq!(extracted.name.as_deref(), Some("dot"));
/// assert_eq!(extracted.original, src);
/// ```
pub fn extract(text: &str) -> Extracted<'_> {
    let stripped = strip_comments(text);
    Extracted {
        original: text,
        literal: array_initializer_content(&stripped),
        name: declared_name(&stripped),
    }
}

/// Replace every comment with spaces of the same byte length.
///
/// Line comments run from `//` up to (not including) the newline. Block
/// comments run from `/*` to the first `*/`; newlines inside them are kept
/// so line numbers do not move. An unterminated `/*` is left as is.
pub fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] != b'/' {
            i += 1;
            continue;
        }

        let end = match bytes[i + 1] {
            b'/' => Some(find_from(bytes, i + 2, b"\n").unwrap_or(bytes.len())),
            b'*' => find_from(bytes, i + 2, b"*/").map(|close| close + 2),
            _ => None,
        };

        let Some(end) = end else {
            i += 1;
            continue;
        };

        out.push_str(&text[copied..i]);
        for &b in &bytes[i..end] {
            out.push(if b == b'\n' { '\n' } else { ' ' });
        }
        copied = end;
        i = end;
    }

    out.push_str(&text[copied..]);
    out
}

/// Contents of the first `= {...}` / `= [...]` block, without the brackets.
///
/// Nested brackets are balanced. Returns `None` when there is no such block
/// or it is never closed.
pub fn array_initializer(text: &str) -> Option<&str> {
    initializer_span(text).map(|span| &text[span.open + 1..span.close])
}

/// Initializer contents with whitespace runs collapsed and ends trimmed.
///
/// Falls back to the whole fragment when no block is found, so bare lists
/// like `"1, 2, 3"` pass straight through.
pub fn array_initializer_content(text: &str) -> String {
    match array_initializer(text) {
        Some(inner) => inner.split_whitespace().collect::<Vec<_>>().join(" "),
        None => text.to_string(),
    }
}

/// Identifier directly before the `[` of the array declarator.
///
/// `const unsigned char font[] PROGMEM = {` yields `font`.
pub fn declared_name(text: &str) -> Option<String> {
    let span = initializer_span(text)?;
    let declarator = &text[..span.equals];
    let bracket = declarator.rfind('[')?;
    let head = declarator[..bracket].trim_end();
    let start = head
        .char_indices()
        .rfind(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let name = &head[start..];

    match name.bytes().next() {
        Some(b) if !b.is_ascii_digit() => Some(name.to_string()),
        _ => None,
    }
}

/// Byte positions of the `=`, the opening bracket and its matching close.
struct InitializerSpan {
    equals: usize,
    open: usize,
    close: usize,
}

fn initializer_span(text: &str) -> Option<InitializerSpan> {
    let bytes = text.as_bytes();

    for (equals, _) in text.match_indices('=') {
        let mut open = equals + 1;
        while open < bytes.len() && bytes[open].is_ascii_whitespace() {
            open += 1;
        }
        if open >= bytes.len() || !matches!(bytes[open], b'{' | b'[') {
            continue;
        }

        let mut depth = 0usize;
        for (offset, &b) in bytes[open..].iter().enumerate() {
            match b {
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(InitializerSpan { equals, open, close: open + offset });
                    }
                }
                _ => {}
            }
        }
        // Unclosed block: later `=` signs are inside it, so stop looking.
        return None;
    }

    None
}

fn find_from(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    if start > haystack.len() {
        return None;
    }
    haystack[start..].windows(needle.len()).position(|w| w == needle).map(|p| p + start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment_keeps_newline() {
        let text = "0x01, // first\n0x02";
        let stripped = strip_comments(text);
        assert_eq!(stripped, "0x01,         \n0x02");
        assert_eq!(stripped.len(), text.len());
    }

    #[test]
    fn test_strip_block_comment() {
        let text = "{ /*8x8*/ 1, 2 }";
        assert_eq!(strip_comments(text), "{         1, 2 }");
    }

    #[test]
    fn test_strip_block_comment_is_non_greedy() {
        let text = "/*a*/ 1 /*b*/ 2";
        assert_eq!(strip_comments(text), "      1       2");
    }

    #[test]
    fn test_strip_multiline_block_comment_keeps_lines() {
        let text = "/* one\ntwo */3";
        assert_eq!(strip_comments(text), "      \n      3");
    }

    #[test]
    fn test_strip_unterminated_block_comment_is_left_alone() {
        let text = "1, 2 /* never closed";
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_strip_line_comment_at_end_of_input() {
        assert_eq!(strip_comments("1 //x"), "1    ");
    }

    #[test]
    fn test_strip_preserves_multibyte_offsets() {
        let text = "1 // héllo\n2";
        let stripped = strip_comments(text);
        assert_eq!(stripped.len(), text.len());
        assert!(stripped.ends_with("\n2"));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let samples = [
            "a // b\nc /* d */ e",
            "/* open // nested\n",
            "x /*/ y */ z",
            "/",
            "",
        ];
        for sample in samples {
            let once = strip_comments(sample);
            assert_eq!(strip_comments(&once), once, "not idempotent for {:?}", sample);
            assert_eq!(once.len(), sample.len());
        }
    }

    #[test]
    fn test_initializer_braces() {
        let text = "const unsigned char x[] PROGMEM = {\n\t0x01,   0x02,\r\n 0x03 };";
        assert_eq!(array_initializer_content(text), "0x01, 0x02, 0x03");
    }

    #[test]
    fn test_initializer_square_brackets() {
        assert_eq!(array_initializer_content("let x = [1, 2]"), "1, 2");
    }

    #[test]
    fn test_initializer_skips_equals_without_block() {
        let text = "#define N = 3\nconst char a[] = {4, 5};";
        assert_eq!(array_initializer_content(text), "4, 5");
    }

    #[test]
    fn test_initializer_nested_blocks() {
        assert_eq!(array_initializer("a = {{1}, {2}}; b = {3}"), Some("{1}, {2}"));
    }

    #[test]
    fn test_initializer_fallback_returns_input() {
        assert_eq!(array_initializer_content("1, 2, 3"), "1, 2, 3");
        assert_eq!(array_initializer_content("a = { 1, 2"), "a = { 1, 2");
        assert_eq!(array_initializer_content("a = {   }"), "");
    }

    #[test]
    fn test_declared_name() {
        assert_eq!(
            declared_name("const unsigned char font[] PROGMEM = {1};").as_deref(),
            Some("font")
        );
        assert_eq!(declared_name("const uint8_t PROGMEM hero_2 [ 16 ] = {1};").as_deref(), Some("hero_2"));
        assert_eq!(declared_name("= {1}"), None);
        assert_eq!(declared_name("1, 2"), None);
    }

    #[test]
    fn test_declared_name_edges() {
        assert_eq!(declared_name("x[] = {1};").as_deref(), Some("x"));
        assert_eq!(declared_name("static const char *icons[] = {1};").as_deref(), Some("icons"));
        assert_eq!(declared_name("char 9lives[] = {1};"), None);
        assert_eq!(declared_name("char [] = {1};"), None);
        assert_eq!(declared_name("héro_ä[] = {1};"), None);
    }

    #[test]
    fn test_extract_ignores_brackets_in_comments() {
        let text = "const uint8_t s[] = { // see table[3] }\n 1, 2 };";
        let extracted = extract(text);
        assert_eq!(extracted.literal, "1, 2");
        assert_eq!(extracted.name.as_deref(), Some("s"));
    }
}
