//! Error types for folio.

/// Errors that can occur while building or decoding a book model.
///
/// Only configuration mistakes and unavailable chapter sources are ever
/// surfaced. Resolution misses and empty chapters are absorbed by the
/// fallback chains and never become errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A budget parameter was zero or otherwise unusable.
    #[error("invalid budget: {name} = {value} (must be > 0)")]
    InvalidBudget {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// A chapter's bytes could not be obtained or converted.
    #[error("chapter {chapter_index} unavailable: {reason}")]
    SourceUnavailable {
        /// Spine index of the chapter.
        chapter_index: usize,
        /// Human-readable cause reported by the converter.
        reason: String,
    },

    /// A persisted position string could not be parsed.
    #[error("position decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
