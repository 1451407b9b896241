//! Book-wide character address space.
//!
//! Chapters are laid end to end in spine order:
//!
//! ```text
//! chapter lengths:     1000        4000
//! address space:   [0 ..... 1000 ............ 5000)
//! start offsets:    0       1000
//! ```
//!
//! Chapters that were skipped during parsing take no space and have no entry.

/// One processed chapter's place in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSpan {
    /// Spine index of the chapter.
    pub chapter_index: usize,
    /// Global offset of the chapter's first char.
    pub start: usize,
    /// Chapter length in chars.
    pub len: usize,
}

impl ChapterSpan {
    /// One past the chapter's last global offset.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Cumulative chapter offsets and total book length.
///
/// Built one chapter at a time, in spine order, then read-only.
///
/// ```rust
/// use folio::BookIndex;
///
/// let mut index = BookIndex::new();
/// index.push_chapter(0, 1000);
/// index.push_chapter(1, 4000);
///
/// assert_eq!(index.chapter_start_offsets(), vec![0, 1000]);
/// assert_eq!(index.total_character_count(), 5000);
/// assert_eq!(index.book_progress(4500), 0.9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookIndex {
    spans: Vec<ChapterSpan>,
    total_character_count: usize,
}

impl BookIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next chapter.
    ///
    /// The chapter starts where the book currently ends. Chapters must be
    /// pushed in increasing spine order.
    pub fn push_chapter(&mut self, chapter_index: usize, len: usize) {
        debug_assert!(
            self.spans
                .last()
                .map_or(true, |s| s.chapter_index < chapter_index),
            "chapters must be pushed in spine order"
        );
        self.spans.push(ChapterSpan {
            chapter_index,
            start: self.total_character_count,
            len,
        });
        self.total_character_count += len;
    }

    /// Start offset of every processed chapter, in spine order.
    #[must_use]
    pub fn chapter_start_offsets(&self) -> Vec<usize> {
        self.spans.iter().map(|s| s.start).collect()
    }

    /// All processed chapters.
    #[must_use]
    pub fn spans(&self) -> &[ChapterSpan] {
        &self.spans
    }

    /// Total length of all processed chapters.
    #[must_use]
    pub fn total_character_count(&self) -> usize {
        self.total_character_count
    }

    /// Number of processed chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether no chapter has been processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The span of `chapter_index`, if it was processed.
    #[must_use]
    pub fn chapter(&self, chapter_index: usize) -> Option<&ChapterSpan> {
        self.spans
            .binary_search_by_key(&chapter_index, |s| s.chapter_index)
            .ok()
            .map(|i| &self.spans[i])
    }

    /// Global offset of a chapter-relative offset.
    ///
    /// Unknown chapters map to 0.
    #[must_use]
    pub fn global_offset(&self, chapter_index: usize, offset: usize) -> usize {
        self.chapter(chapter_index)
            .map_or(0, |s| s.start + offset.min(s.len))
    }

    /// `offset / chapter_len`, or 0.0 for an empty chapter.
    #[must_use]
    pub fn chapter_progress(offset: usize, chapter_len: usize) -> f64 {
        ratio(offset, chapter_len)
    }

    /// `global_offset / total`, or 0.0 for an empty book.
    #[must_use]
    pub fn book_progress(&self, global_offset: usize) -> f64 {
        ratio(global_offset, self.total_character_count)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).clamp(0.0, 1.0)
    }
}
