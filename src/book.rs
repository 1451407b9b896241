//! Whole-book processing: chapters in, pages and index out.
//!
//! ```text
//! ChapterSource --convert--> StyledText --paragraphs--> segment --> pages
//!                                                           |
//!                                     BookIndex <-- length -+
//! ```
//!
//! Each chapter is segmented independently. Only the final fold into the
//! [`BookIndex`] depends on spine order, so the per-chapter step can be moved
//! onto worker threads without touching the reduction.

use std::ops::Range;

use log::{debug, warn};

use crate::budget::SegmentBudget;
use crate::error::{Error, Result};
use crate::index::BookIndex;
use crate::page::Page;
use crate::paragraph::extract_paragraphs;
use crate::segment::Segmenter;
use crate::text::StyledText;

/// Raw bytes of one spine item, before markup conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSource {
    /// Display title of the chapter.
    pub title: String,
    /// Undecoded chapter body.
    pub bytes: Vec<u8>,
}

impl ChapterSource {
    /// Create a chapter source.
    #[must_use]
    pub fn new(title: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            bytes: bytes.into(),
        }
    }
}

/// Boxed error returned by a [`ChapterConverter`].
pub type ConvertError = Box<dyn std::error::Error + Send + Sync>;

/// Markup-to-styled-text conversion, supplied by the caller.
///
/// The returned payload's plain-text projection is trusted as ground truth
/// for lengths and offsets.
pub trait ChapterConverter {
    /// The styled payload produced.
    type Styled: StyledText;

    /// Convert one chapter.
    ///
    /// # Errors
    ///
    /// Any error marks the chapter as unavailable.
    fn convert(&self, source: &ChapterSource) -> std::result::Result<Self::Styled, ConvertError>;
}

/// Treats chapter bytes as UTF-8 plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl ChapterConverter for PlainTextConverter {
    type Styled = String;

    fn convert(&self, source: &ChapterSource) -> std::result::Result<String, ConvertError> {
        Ok(String::from_utf8(source.bytes.clone())?)
    }
}

/// Why a chapter contributed no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The converter failed.
    SourceUnavailable(String),
    /// The converter returned no text.
    Empty,
}

/// A chapter left out of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChapter {
    /// Spine index of the chapter.
    pub chapter_index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of a lenient parse: the model plus whatever was skipped.
#[derive(Debug, Clone)]
pub struct ParsedBook<S> {
    /// Pages and index for every chapter that produced text.
    pub model: BookModel<S>,
    /// Chapters that did not, in spine order.
    pub skipped: Vec<SkippedChapter>,
}

impl<S> ParsedBook<S> {
    /// The first unavailable chapter, as an error.
    ///
    /// Empty chapters are not failures and are ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] if any chapter failed to convert.
    pub fn into_strict(self) -> Result<BookModel<S>> {
        let failed = self.skipped.into_iter().find_map(|s| match s.reason {
            SkipReason::SourceUnavailable(reason) => Some(Error::SourceUnavailable {
                chapter_index: s.chapter_index,
                reason,
            }),
            SkipReason::Empty => None,
        });
        match failed {
            Some(err) => Err(err),
            None => Ok(self.model),
        }
    }
}

/// Immutable snapshot of a processed book.
///
/// Pages of one chapter are contiguous and chapters appear in spine order.
/// All queries take `&self`, so a model can be shared between readers
/// freely. Changes produce a new model, see
/// [`with_chapter_replaced`](Self::with_chapter_replaced).
#[derive(Debug, Clone, PartialEq)]
pub struct BookModel<S> {
    pages: Vec<Page<S>>,
    chapter_titles: Vec<String>,
    book_index: BookIndex,
    budget: SegmentBudget,
}

impl<S: StyledText> BookModel<S> {
    /// Every page of the book, in reading order.
    #[must_use]
    pub fn pages(&self) -> &[Page<S>] {
        &self.pages
    }

    /// A single page.
    #[must_use]
    pub fn page(&self, page_index: usize) -> Option<&Page<S>> {
        self.pages.get(page_index)
    }

    /// Titles of all source chapters, including skipped ones.
    #[must_use]
    pub fn chapter_titles(&self) -> &[String] {
        &self.chapter_titles
    }

    /// The book-wide address space.
    #[must_use]
    pub fn book_index(&self) -> &BookIndex {
        &self.book_index
    }

    /// The budget the pages were built with.
    #[must_use]
    pub fn budget(&self) -> &SegmentBudget {
        &self.budget
    }

    /// Range of page indices belonging to `chapter_index`.
    ///
    /// Empty for skipped or unknown chapters.
    #[must_use]
    pub fn chapter_pages(&self, chapter_index: usize) -> Range<usize> {
        let start = self
            .pages
            .partition_point(|p| p.chapter_index < chapter_index);
        let end = self
            .pages
            .partition_point(|p| p.chapter_index <= chapter_index);
        start..end
    }

    /// Current length of a chapter, 0 if it has no pages.
    #[must_use]
    pub fn chapter_len(&self, chapter_index: usize) -> usize {
        self.book_index.chapter(chapter_index).map_or(0, |s| s.len)
    }

    /// A copy of this model with one chapter re-segmented from new text.
    ///
    /// The receiver is left untouched, so readers holding the old snapshot
    /// keep a consistent view until they swap to the returned one.
    #[must_use]
    pub fn with_chapter_replaced(&self, chapter_index: usize, title: &str, content: S) -> Self {
        let mut builder = BookBuilder::new(self.budget);

        let mut titles = self.chapter_titles.clone();
        if titles.len() <= chapter_index {
            titles.resize(chapter_index + 1, String::new());
        }
        titles[chapter_index] = title.to_string();

        let mut replacement = Some(content);
        for (index, existing) in titles.iter().enumerate() {
            if index == chapter_index {
                if let Some(content) = replacement.take() {
                    builder.add_chapter(existing, content);
                }
                continue;
            }
            let range = self.chapter_pages(index);
            if range.is_empty() {
                builder.add_skipped(existing, SkipReason::Empty);
            } else {
                builder.add_pages(existing, self.pages[range].to_vec());
            }
        }

        builder.finish().model
    }
}

/// Incremental model construction, one chapter at a time in spine order.
///
/// ```rust
/// use folio::{BookBuilder, SegmentBudget};
///
/// let mut builder = BookBuilder::new(SegmentBudget::default());
/// builder.add_chapter("One", "a".repeat(1000));
/// builder.add_chapter("Blank", String::new());
/// builder.add_chapter("Two", "b".repeat(4000));
///
/// let parsed = builder.finish();
/// assert_eq!(parsed.skipped.len(), 1);
/// assert_eq!(parsed.model.book_index().chapter_start_offsets(), vec![0, 1000]);
/// assert_eq!(parsed.model.chapter_titles().len(), 3);
/// ```
#[derive(Debug)]
pub struct BookBuilder<S> {
    segmenter: Segmenter,
    pages: Vec<Page<S>>,
    chapter_titles: Vec<String>,
    book_index: BookIndex,
    skipped: Vec<SkippedChapter>,
}

impl<S: StyledText> BookBuilder<S> {
    /// Start an empty book.
    #[must_use]
    pub fn new(budget: SegmentBudget) -> Self {
        Self {
            segmenter: Segmenter::new(budget),
            pages: Vec::new(),
            chapter_titles: Vec::new(),
            book_index: BookIndex::new(),
            skipped: Vec::new(),
        }
    }

    /// Segment and append the next chapter.
    pub fn add_chapter(&mut self, title: &str, content: S) {
        let chapter_index = self.chapter_titles.len();
        let paragraphs = extract_paragraphs(content.plain_text());
        let pages = self
            .segmenter
            .segment(&content, &paragraphs, chapter_index, title);
        if pages.is_empty() {
            self.add_skipped(title, SkipReason::Empty);
        } else {
            self.add_pages(title, pages);
        }
    }

    /// Record the next chapter as skipped.
    pub fn add_skipped(&mut self, title: &str, reason: SkipReason) {
        let chapter_index = self.chapter_titles.len();
        match &reason {
            SkipReason::SourceUnavailable(cause) => {
                warn!("skipping chapter {} ({:?}): {}", chapter_index, title, cause);
            }
            SkipReason::Empty => debug!("chapter {} ({:?}) is empty", chapter_index, title),
        }
        self.chapter_titles.push(title.to_string());
        self.skipped.push(SkippedChapter {
            chapter_index,
            reason,
        });
    }

    /// Append already segmented pages as the next chapter.
    fn add_pages(&mut self, title: &str, mut pages: Vec<Page<S>>) {
        let chapter_index = self.chapter_titles.len();
        let len = pages.last().map_or(0, |p| p.chapter_range.end);
        for page in &mut pages {
            page.chapter_index = chapter_index;
            page.chapter_title = title.to_string();
        }
        self.book_index.push_chapter(chapter_index, len);
        self.chapter_titles.push(title.to_string());
        self.pages.extend(pages);
    }

    /// Freeze the model.
    #[must_use]
    pub fn finish(self) -> ParsedBook<S> {
        debug!(
            "built book: {} chapters, {} pages, {} chars, {} skipped",
            self.chapter_titles.len(),
            self.pages.len(),
            self.book_index.total_character_count(),
            self.skipped.len()
        );
        ParsedBook {
            model: BookModel {
                pages: self.pages,
                chapter_titles: self.chapter_titles,
                book_index: self.book_index,
                budget: *self.segmenter.budget(),
            },
            skipped: self.skipped,
        }
    }
}

/// Convert and segment every chapter, skipping the ones that fail.
///
/// ```rust
/// use folio::{parse, ChapterSource, PlainTextConverter, SegmentBudget};
///
/// let chapters = vec![
///     ChapterSource::new("One", "First chapter.\nSecond line."),
///     ChapterSource::new("Broken", vec![0xffu8, 0xfe]),
/// ];
/// let parsed = parse(&chapters, &PlainTextConverter, SegmentBudget::default());
///
/// assert_eq!(parsed.model.pages().len(), 1);
/// assert_eq!(parsed.skipped[0].chapter_index, 1);
/// ```
pub fn parse<C: ChapterConverter>(
    chapters: &[ChapterSource],
    converter: &C,
    budget: SegmentBudget,
) -> ParsedBook<C::Styled> {
    let mut builder = BookBuilder::new(budget);
    for source in chapters {
        match converter.convert(source) {
            Ok(content) => builder.add_chapter(&source.title, content),
            Err(err) => {
                builder.add_skipped(&source.title, SkipReason::SourceUnavailable(err.to_string()))
            }
        }
    }
    builder.finish()
}

/// Like [`parse`], but fails on the first unavailable chapter.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] naming the first chapter whose
/// conversion failed.
pub fn parse_strict<C: ChapterConverter>(
    chapters: &[ChapterSource],
    converter: &C,
    budget: SegmentBudget,
) -> Result<BookModel<C::Styled>> {
    parse(chapters, converter, budget).into_strict()
}
