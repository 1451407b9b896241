//! Stable, serializable reading positions.
//!
//! A [`Position`] remembers *what* the reader was looking at, not *where* it
//! was drawn. It carries three independent ways back to the same spot:
//!
//! | Field | Survives reflow | Survives content edits |
//! |-------|-----------------|------------------------|
//! | `context_snippet` | yes, exactly | usually |
//! | `paragraph_index` + `character_offset` | yes | rarely |
//! | `chapter_progress` | approximately | approximately |
//!
//! The persisted form is a flat JSON object:
//!
//! ```text
//! {"chapterIndex":2,"paragraphIndex":5,"characterOffset":6,
//!  "contextSnippet":"...","chapterProgress":0.41,"bookProgress":0.17}
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// A content-addressed reading location.
///
/// Plain value type: copy it, compare it, store it.
///
/// ```rust
/// use folio::Position;
///
/// let position = Position {
///     chapter_index: 2,
///     paragraph_index: 5,
///     character_offset: 6,
///     context_snippet: "It was a dark and stormy night".into(),
///     chapter_progress: 0.25,
///     book_progress: 0.1,
/// };
///
/// let stored = position.encode();
/// assert_eq!(Position::decode(&stored), Some(position));
/// assert_eq!(Position::decode("not json"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    /// Spine index of the chapter.
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_index: usize,
    /// Chapter-relative rank of the anchoring paragraph.
    #[serde(deserialize_with = "null_as_default")]
    pub paragraph_index: usize,
    /// Offset of the anchor from the paragraph's start on its page.
    #[serde(deserialize_with = "null_as_default")]
    pub character_offset: usize,
    /// Newline-collapsed, trimmed text around the anchor.
    #[serde(deserialize_with = "null_as_default")]
    pub context_snippet: String,
    /// Anchor offset over chapter length at creation time.
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_progress: f64,
    /// Anchor offset over book length at creation time.
    #[serde(deserialize_with = "null_as_default")]
    pub book_progress: f64,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Position {
    /// The very beginning of the book.
    #[must_use]
    pub fn book_start() -> Self {
        Self::chapter_start(0)
    }

    /// The beginning of a chapter.
    #[must_use]
    pub fn chapter_start(chapter_index: usize) -> Self {
        Self {
            chapter_index,
            paragraph_index: 0,
            character_offset: 0,
            context_snippet: String::new(),
            chapter_progress: 0.0,
            book_progress: 0.0,
        }
    }

    /// Serialize to the persisted JSON form.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serializing plain fields into a String cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a persisted position, or `None` if the text is not a position.
    ///
    /// Missing fields take their [`book_start`](Self::book_start) values and
    /// unknown fields are ignored, so records written by older or newer
    /// versions still restore.
    #[must_use]
    pub fn decode(encoded: &str) -> Option<Self> {
        Self::try_decode(encoded).ok()
    }

    /// Like [`decode`](Self::decode), keeping the parse error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if `encoded` is not a
    /// JSON object with correctly typed fields.
    pub fn try_decode(encoded: &str) -> Result<Self> {
        let mut position: Self = serde_json::from_str(encoded)?;
        position.chapter_progress = clamp_unit(position.chapter_progress);
        position.book_progress = clamp_unit(position.book_progress);
        Ok(position)
    }

    /// Book progress as a whole percentage, for display.
    #[must_use]
    pub fn percent(&self) -> u8 {
        (clamp_unit(self.book_progress) * 100.0).round() as u8
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::book_start()
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
