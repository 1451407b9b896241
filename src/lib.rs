//! # folio
//!
//! Reflow-stable segmentation and reading positions for long-form documents.
//!
//! ## The Problem
//!
//! A reader closes a book on a phone in portrait and reopens it on a tablet
//! in landscape with a larger font. "Scroll offset 18 230 px" now points at
//! a different sentence. Pixel positions do not survive re-layout.
//!
//! Two things are needed:
//!
//! - Chapters cut into bounded pieces that can be rendered lazily, with cuts
//!   that do not move when the view changes
//! - A way to write down *where* the reader is that can be resolved again
//!   after the cuts, the layout, or even the text have changed
//!
//! ## Pipeline
//!
//! ```text
//! chapter text ──► extract_paragraphs ──► Segmenter ──► Page, Page, ...
//!                                                          │
//!                                     BookIndex ◄── length ┘
//!
//! (page, offset) ──create_position──► Position ──encode──► "{...}"
//! "{...}" ──decode──► Position ──resolve_position──► (page, offset)
//! ```
//!
//! ### Segmentation
//!
//! Pages are at most `max_segment_chars` long (3000 by default). A cut
//! prefers the end of a paragraph, then the char after a newline in the
//! last 500 chars, then the budget itself. Cuts depend on text alone, so a
//! resize never re-segments.
//!
//! ### Positions
//!
//! A [`Position`] records the chapter, the anchoring paragraph and offset,
//! about 50 chars of surrounding text, and chapter/book progress ratios.
//! Resolution tries, in order:
//!
//! 1. the full context snippet
//! 2. its first five words
//! 3. the chapter progress ratio
//! 4. the first page of the chapter
//!
//! so it always lands somewhere sensible, even after the text was edited.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::{
//!     create_position, parse, resolve_position, ChapterSource, PlainTextConverter, Position,
//!     SegmentBudget,
//! };
//!
//! let chapters = vec![
//!     ChapterSource::new("Loomings", "Call me Ishmael.\nSome years ago, never mind how long."),
//!     ChapterSource::new("The Carpet-Bag", "I stuffed a shirt or two into my old carpet-bag."),
//! ];
//! let book = parse(&chapters, &PlainTextConverter, SegmentBudget::default()).model;
//!
//! // The view reports what is at the top of the screen.
//! let saved = create_position(&book, 1, 12).encode();
//!
//! // Later, possibly after a re-layout.
//! let position = Position::decode(&saved).unwrap_or_default();
//! let location = resolve_position(&book, &position);
//! assert_eq!((location.page_index, location.offset), (1, 12));
//! ```
//!
//! ## Concurrency
//!
//! A finished [`BookModel`] is an immutable snapshot. `create_position` and
//! `resolve_position` take `&BookModel`, so any number of readers can share
//! one. Content changes build a new model with
//! [`BookModel::with_chapter_replaced`] for the caller to swap in.

mod book;
mod budget;
mod codec;
mod error;
mod index;
mod page;
mod paragraph;
mod position;
mod segment;
mod text;

pub use book::{
    parse, parse_strict, BookBuilder, BookModel, ChapterConverter, ChapterSource, ConvertError,
    ParsedBook, PlainTextConverter, SkipReason, SkippedChapter,
};
pub use budget::SegmentBudget;
pub use codec::{
    create_position, resolve, resolve_chapter_offset, resolve_position, Location, Resolution,
    Strategy,
};
pub use error::{Error, Result};
pub use index::{BookIndex, ChapterSpan};
pub use page::Page;
pub use paragraph::{extract_paragraphs, Paragraph};
pub use position::Position;
pub use segment::Segmenter;
pub use text::StyledText;
