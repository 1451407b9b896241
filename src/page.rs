//! The Page type: a bounded, renderable slice of one chapter.

use std::ops::Range;

use crate::paragraph::Paragraph;
use crate::text::StyledText;

/// A segment of a chapter, small enough to render and scroll lazily.
///
/// Pages are built once by the [segmenter](crate::segment) and never
/// mutated. When a chapter's content changes, the whole chapter is
/// reprocessed and its pages are replaced as a unit.
///
/// ## Two Coordinate Spaces
///
/// `chapter_range` places the page inside its chapter. `paragraphs` are
/// page-local:
///
/// ```text
/// Chapter: [0 ................................ 3200)
/// Page 0:  [0 ............ 2950)
/// Page 1:                       [2950 ... 3200)
///           local 0 ............. 250
/// ```
///
/// A paragraph that straddles a cut appears, clipped, on both pages with the
/// same chapter-relative `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<S> {
    /// Caller-owned styled payload for this slice.
    pub content: S,
    /// Spine index of the owning chapter.
    pub chapter_index: usize,
    /// Title of the owning chapter.
    pub chapter_title: String,
    /// Zero-based rank of this page within its chapter.
    pub segment_index: usize,
    /// Whether this is the chapter's first page.
    pub is_first_segment: bool,
    /// Whether this is the chapter's last page.
    pub is_last_segment: bool,
    /// Span of this page in chapter-relative chars.
    pub chapter_range: Range<usize>,
    /// Paragraphs clipped to this page, in page-local chars.
    pub paragraphs: Vec<Paragraph>,
    /// Length of the plain-text projection in chars.
    pub character_count: usize,
}

impl<S: StyledText> Page<S> {
    /// Plain text of this page.
    #[must_use]
    pub fn plain_text(&self) -> &str {
        self.content.plain_text()
    }

    /// The local paragraph containing `local_offset`, if any.
    #[must_use]
    pub fn paragraph_at(&self, local_offset: usize) -> Option<&Paragraph> {
        let idx = self
            .paragraphs
            .partition_point(|p| p.end() <= local_offset);
        self.paragraphs.get(idx).filter(|p| p.contains(local_offset))
    }

    /// The local paragraph with chapter-relative rank `index`, if on this page.
    #[must_use]
    pub fn paragraph_by_index(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.index == index)
    }

    /// Chapter-relative offset of a page-local offset.
    #[must_use]
    pub fn to_chapter_offset(&self, local_offset: usize) -> usize {
        self.chapter_range.start + local_offset.min(self.character_count)
    }

    /// Whether the chapter-relative `offset` falls on this page.
    ///
    /// The last page also owns the chapter's end offset.
    #[must_use]
    pub fn owns_chapter_offset(&self, offset: usize) -> bool {
        self.chapter_range.contains(&offset)
            || (self.is_last_segment && offset == self.chapter_range.end)
    }
}

impl<S> std::fmt::Display for Page<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page {{ chapter: {}, segment: {}, span: {}..{}, len: {} }}",
            self.chapter_index,
            self.segment_index,
            self.chapter_range.start,
            self.chapter_range.end,
            self.character_count
        )
    }
}
