//! Character-offset helpers and the styled-text seam.
//!
//! Every offset in this crate counts Unicode scalar values, not bytes.
//! Rust strings are indexed by byte, so the conversion lives here and
//! nowhere else.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Opaque styled content owned by the caller.
///
/// The core only ever asks for the plain-text projection and for sub-slices
/// of it. Whatever styling the payload carries travels along untouched.
///
/// ```rust
/// use folio::StyledText;
///
/// let text = String::from("héllo world");
/// assert_eq!(text.char_len(), 11);
/// // "é" is two bytes wide
/// assert_eq!(text.slice(1..6), "éllo");
/// ```
pub trait StyledText: Clone {
    /// Plain-text projection of the payload.
    fn plain_text(&self) -> &str;

    /// Sub-slice covering `range` of the plain text.
    ///
    /// `range` is in bytes of [`plain_text`](Self::plain_text) and both ends
    /// sit on char boundaries. Byte ranges let the segmenter cut a long
    /// chapter in one pass instead of re-walking it for every page.
    fn slice(&self, range: Range<usize>) -> Self;

    /// Length of the plain text in chars.
    fn char_len(&self) -> usize {
        self.plain_text().chars().count()
    }
}

impl StyledText for String {
    fn plain_text(&self) -> &str {
        self
    }

    fn slice(&self, range: Range<usize>) -> Self {
        self[range].to_string()
    }
}

/// Byte offset of the char at index `char_idx`, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Slice `text` by char range, clamping both ends to the text.
pub(crate) fn slice_chars(text: &str, range: Range<usize>) -> &str {
    let start = byte_offset(text, range.start);
    let end = byte_offset(text, range.end.max(range.start));
    &text[start..end]
}

/// Char index of byte offset `byte` (which must sit on a char boundary).
pub(crate) fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Line-break characters recognised as paragraph separators.
pub(crate) fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Map every line break to a single space.
///
/// The mapping is 1:1 in chars, so offsets into the result are offsets into
/// the input.
pub(crate) fn flatten_line_breaks(text: &str) -> String {
    text.chars()
        .map(|c| if is_line_break(c) { ' ' } else { c })
        .collect()
}

/// Newline-collapsed, whitespace-trimmed form used for context snippets.
pub(crate) fn normalize_snippet(text: &str) -> String {
    flatten_line_breaks(text).trim().to_string()
}

/// Char window `[center - radius, center + radius)` widened outward to
/// grapheme cluster boundaries, so a combining sequence is never split.
pub(crate) fn grapheme_window(text: &str, center: usize, radius: usize) -> Range<usize> {
    let lo = byte_offset(text, center.saturating_sub(radius));
    let hi = byte_offset(text, center.saturating_add(radius));

    let mut start = 0;
    let mut end = text.len();
    for (byte, grapheme) in text.grapheme_indices(true) {
        if byte <= lo {
            start = byte;
        }
        let grapheme_end = byte + grapheme.len();
        if grapheme_end >= hi {
            end = grapheme_end;
            break;
        }
    }
    if hi == 0 {
        end = 0;
    }

    char_offset(text, start)..char_offset(text, end.max(start))
}

/// Char offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn find_chars(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte| char_offset(haystack, byte))
}

/// First place `words` occur in order in `haystack`, separated by any run of
/// whitespace. Returns the match start and its length, both in chars of the
/// original text.
pub(crate) fn find_words(haystack: &str, words: &[&str]) -> Option<(usize, usize)> {
    if words.is_empty() {
        return None;
    }
    let needle = words.join(" ");

    // whitespace runs collapse to one space; `origin[i]` is where collapsed
    // char `i` came from, plus a trailing entry for the end of the text
    let mut collapsed = String::with_capacity(haystack.len());
    let mut origin = Vec::with_capacity(haystack.len() + 1);
    let mut in_space = false;
    let mut total = 0;
    for (i, c) in haystack.chars().enumerate() {
        total = i + 1;
        if c.is_whitespace() {
            if in_space {
                continue;
            }
            in_space = true;
            collapsed.push(' ');
        } else {
            in_space = false;
            collapsed.push(c);
        }
        origin.push(i);
    }
    origin.push(total);

    let start = find_chars(&collapsed, &needle)?;
    // origin of the char after the match, so trailing whitespace is excluded
    let end = origin[start + needle.chars().count()];
    Some((origin[start], end - origin[start]))
}
