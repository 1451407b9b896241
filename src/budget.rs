//! Segmentation and resolution budget.
//!
//! ## Why a Character Budget?
//!
//! Screen width, font size and orientation all change how many characters
//! fit on screen. None of them change the chapter text. Sizing segments by a
//! fixed character budget means a resize only rewraps lines inside pages
//! that already exist:
//!
//! ```text
//! Portrait, 18pt:   [ page 0 ][ page 1 ][ page 2 ]   <- same cuts
//! Landscape, 14pt:  [ page 0 ][ page 1 ][ page 2 ]   <- same cuts
//! ```
//!
//! The remaining knobs tune the fallbacks: how far back the segmenter looks
//! for a newline when no paragraph ends in range, and how much text a
//! position remembers around its anchor.

use crate::error::{Error, Result};

/// Configuration shared by the segmenter and the position codec.
///
/// # Examples
///
/// ```rust
/// use folio::SegmentBudget;
///
/// let budget = SegmentBudget::default();
/// assert_eq!(budget.max_segment_chars(), 3000);
/// assert_eq!(budget.newline_window(), 500);
///
/// let budget = SegmentBudget::new(1200).unwrap().with_snippet_radius(40).unwrap();
/// assert_eq!(budget.max_segment_chars(), 1200);
/// assert_eq!(budget.snippet_radius(), 40);
///
/// assert!(SegmentBudget::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBudget {
    max_segment_chars: usize,
    newline_window: usize,
    snippet_radius: usize,
    prefix_words: usize,
    prefix_min_chars: usize,
}

impl SegmentBudget {
    /// Default per-segment character budget.
    pub const DEFAULT_MAX_SEGMENT_CHARS: usize = 3000;

    /// Create a budget with the given segment size and default fallbacks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBudget`] if `max_segment_chars == 0`.
    pub fn new(max_segment_chars: usize) -> Result<Self> {
        Self::default().with_max_segment_chars(max_segment_chars)
    }

    /// Maximum chars per segment.
    #[must_use]
    pub const fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    /// How far back from the target cut the segmenter searches for a newline.
    #[must_use]
    pub const fn newline_window(&self) -> usize {
        self.newline_window
    }

    /// Chars captured on each side of a position's anchor.
    #[must_use]
    pub const fn snippet_radius(&self) -> usize {
        self.snippet_radius
    }

    /// Words kept when retrying resolution with a shortened snippet.
    #[must_use]
    pub const fn prefix_words(&self) -> usize {
        self.prefix_words
    }

    /// Minimum length a shortened snippet needs before it is searched.
    #[must_use]
    pub const fn prefix_min_chars(&self) -> usize {
        self.prefix_min_chars
    }

    /// Set the per-segment character budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBudget`] if `value == 0`.
    pub fn with_max_segment_chars(self, value: usize) -> Result<Self> {
        positive("max_segment_chars", value)?;
        Ok(Self {
            max_segment_chars: value,
            ..self
        })
    }

    /// Set the newline search window. Zero disables the newline fallback.
    #[must_use]
    pub fn with_newline_window(self, value: usize) -> Self {
        Self {
            newline_window: value,
            ..self
        }
    }

    /// Set the snippet radius.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBudget`] if `value == 0`.
    pub fn with_snippet_radius(self, value: usize) -> Result<Self> {
        positive("snippet_radius", value)?;
        Ok(Self {
            snippet_radius: value,
            ..self
        })
    }

    /// Set the shortened-snippet word count and minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBudget`] if `words == 0`.
    pub fn with_prefix(self, words: usize, min_chars: usize) -> Result<Self> {
        positive("prefix_words", words)?;
        Ok(Self {
            prefix_words: words,
            prefix_min_chars: min_chars,
            ..self
        })
    }

    /// Whether a chapter of `len` chars fits in one segment.
    #[must_use]
    pub fn fits(&self, len: usize) -> bool {
        len <= self.max_segment_chars
    }
}

fn positive(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(Error::InvalidBudget { name, value })
    } else {
        Ok(())
    }
}

impl Default for SegmentBudget {
    fn default() -> Self {
        Self {
            max_segment_chars: Self::DEFAULT_MAX_SEGMENT_CHARS,
            newline_window: 500,
            snippet_radius: 25,
            prefix_words: 5,
            prefix_min_chars: 10,
        }
    }
}

impl TryFrom<usize> for SegmentBudget {
    type Error = Error;

    fn try_from(max_segment_chars: usize) -> Result<Self> {
        Self::new(max_segment_chars)
    }
}
