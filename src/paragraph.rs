//! Paragraph extraction.
//!
//! A paragraph is a run of text terminated by one or more line breaks. The
//! terminating breaks belong to the paragraph they end, so the extracted
//! ranges tile the text with no gaps:
//!
//! ```text
//! "Call me Ishmael.\n\nSome years ago\n"
//!  [0 .................. 18)[18 ........ 33)
//!       paragraph 0             paragraph 1
//! ```
//!
//! Line breaks at the very start of the text are folded into the first
//! paragraph. Any line-break character counts (`\n`, `\r`, U+2029, ...), so
//! single-newline converters and blank-line converters both work.

use std::ops::Range;

use crate::text::is_line_break;

/// A paragraph span inside some coordinate space.
///
/// Straight out of [`extract_paragraphs`] the range is chapter-relative. On a
/// [`Page`](crate::Page) the range is re-based to page-local coordinates while
/// `index` keeps the chapter-relative rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Half-open char range `[start, end)`.
    pub range: Range<usize>,
    /// Zero-based rank of this paragraph within its chapter.
    pub index: usize,
}

impl Paragraph {
    /// Create a paragraph.
    #[must_use]
    pub fn new(range: Range<usize>, index: usize) -> Self {
        Self { range, index }
    }

    /// First char of the paragraph.
    #[must_use]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// One past the last char of the paragraph.
    #[must_use]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the range is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Whether `offset` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(&offset)
    }
}

/// Split plain text into paragraphs.
///
/// Total and deterministic: empty text yields no paragraphs, anything else
/// yields at least one, and the ranges cover `[0, char_len)` exactly.
///
/// ```rust
/// use folio::extract_paragraphs;
///
/// let paragraphs = extract_paragraphs("One.\n\nTwo.\nThree.");
/// assert_eq!(paragraphs.len(), 3);
/// assert_eq!(paragraphs[0].range, 0..6);
/// assert_eq!(paragraphs[1].range, 6..11);
/// assert_eq!(paragraphs[2].range, 11..17);
/// ```
#[must_use]
pub fn extract_paragraphs(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut seen_content = false;
    let mut in_break = false;

    for c in text.chars() {
        if is_line_break(c) {
            in_break = seen_content;
        } else {
            if in_break {
                let index = paragraphs.len();
                paragraphs.push(Paragraph::new(start..offset, index));
                start = offset;
                in_break = false;
            }
            seen_content = true;
        }
        offset += 1;
    }

    if offset > start {
        let index = paragraphs.len();
        paragraphs.push(Paragraph::new(start..offset, index));
    }

    paragraphs
}
