//! Creating and resolving positions against a [`BookModel`].
//!
//! ## Resolution Chain
//!
//! Strategies run in a fixed order; the first hit wins.
//!
//! ```text
//! 1. exact snippet   "It was the best of times, it was the wor"  exact under reflow
//! 2. prefix snippet  "It was the best of"                        tolerates edits
//! 3. progress        round(0.41 * chapter_len)                   coarse, always works
//! 4. chapter start   (first page of chapter, 0)
//! ```
//!
//! A chapter that no longer exists (or has no pages) resolves to the start
//! of the book. Nothing in this module fails.

use log::trace;

use crate::book::BookModel;
use crate::index::BookIndex;
use crate::page::Page;
use crate::paragraph::Paragraph;
use crate::position::Position;
use crate::text::{
    find_chars, find_words, flatten_line_breaks, grapheme_window, normalize_snippet, slice_chars,
    StyledText,
};

/// A page and a char offset within it, as consumed by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Index into [`BookModel::pages`].
    pub page_index: usize,
    /// Page-local char offset.
    pub offset: usize,
}

impl Location {
    /// Create a location.
    #[must_use]
    pub const fn new(page_index: usize, offset: usize) -> Self {
        Self { page_index, offset }
    }
}

/// Which step of the chain produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The full context snippet was found.
    ExactSnippet,
    /// The first few words of the snippet were found.
    PrefixSnippet,
    /// Estimated from chapter progress.
    Progress,
    /// Fell back to the chapter's first page.
    ChapterStart,
    /// The chapter has no pages; fell back to the first page of the book.
    BookStart,
}

/// A resolved location and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Where to scroll.
    pub location: Location,
    /// Which strategy matched.
    pub strategy: Strategy,
}

/// How the anchoring paragraph of a new position was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor<'a> {
    /// The paragraph containing the offset.
    Containing(&'a Paragraph),
    /// The offset sits at the end of the page; use the page's last paragraph.
    LastOnPage(&'a Paragraph),
    /// The page has no paragraphs at all.
    Synthetic,
}

impl<'a> Anchor<'a> {
    fn for_offset<S: StyledText>(page: &'a Page<S>, local_offset: usize) -> Self {
        match (page.paragraph_at(local_offset), page.paragraphs.last()) {
            (Some(p), _) => Anchor::Containing(p),
            (None, Some(p)) => Anchor::LastOnPage(p),
            (None, None) => Anchor::Synthetic,
        }
    }

    fn index(self) -> usize {
        match self {
            Anchor::Containing(p) | Anchor::LastOnPage(p) => p.index,
            Anchor::Synthetic => 0,
        }
    }

    fn start(self) -> usize {
        match self {
            Anchor::Containing(p) | Anchor::LastOnPage(p) => p.start(),
            Anchor::Synthetic => 0,
        }
    }
}

/// Build a [`Position`] for `local_offset` on page `page_index`.
///
/// The offset is clamped to the page. An unknown page yields
/// [`Position::book_start`].
///
/// ```rust
/// use folio::{create_position, resolve_position, BookBuilder, Location, SegmentBudget};
///
/// let mut builder = BookBuilder::new(SegmentBudget::default());
/// builder.add_chapter("One", "Call me Ishmael.\nSome years ago, never mind how long.".to_string());
/// let model = builder.finish().model;
///
/// let position = create_position(&model, 0, 22);
/// assert_eq!(position.paragraph_index, 1);
/// assert_eq!(position.character_offset, 5);
/// assert_eq!(resolve_position(&model, &position), Location::new(0, 22));
/// ```
#[must_use]
pub fn create_position<S: StyledText>(
    model: &BookModel<S>,
    page_index: usize,
    local_offset: usize,
) -> Position {
    let Some(page) = model.page(page_index) else {
        return Position::book_start();
    };

    let local_offset = local_offset.min(page.character_count);
    let chapter_offset = page.to_chapter_offset(local_offset);
    let anchor = Anchor::for_offset(page, local_offset);

    let text = page.plain_text();
    let window = grapheme_window(text, local_offset, model.budget().snippet_radius());
    let context_snippet = normalize_snippet(slice_chars(text, window));

    let index = model.book_index();
    let global_offset = index.global_offset(page.chapter_index, chapter_offset);

    Position {
        chapter_index: page.chapter_index,
        paragraph_index: anchor.index(),
        character_offset: local_offset.saturating_sub(anchor.start()),
        context_snippet,
        chapter_progress: BookIndex::chapter_progress(
            chapter_offset,
            model.chapter_len(page.chapter_index),
        ),
        book_progress: index.book_progress(global_offset),
    }
}

/// Resolve a position to a location. Never fails.
#[must_use]
pub fn resolve_position<S: StyledText>(model: &BookModel<S>, position: &Position) -> Location {
    resolve(model, position).location
}

type StrategyFn<S> = fn(&BookModel<S>, &Position) -> Option<Location>;

/// Resolve a position, reporting which strategy matched.
#[must_use]
pub fn resolve<S: StyledText>(model: &BookModel<S>, position: &Position) -> Resolution {
    let pages = model.chapter_pages(position.chapter_index);
    if pages.is_empty() {
        trace!(
            "chapter {} has no pages, resolving to book start",
            position.chapter_index
        );
        return Resolution {
            location: Location::default(),
            strategy: Strategy::BookStart,
        };
    }

    let chain: [(Strategy, StrategyFn<S>); 3] = [
        (Strategy::ExactSnippet, exact_snippet::<S>),
        (Strategy::PrefixSnippet, prefix_snippet::<S>),
        (Strategy::Progress, progress::<S>),
    ];

    chain
        .iter()
        .find_map(|&(strategy, run)| {
            let hit = run(model, position);
            trace!("{:?} -> {:?}", strategy, hit);
            hit.map(|location| Resolution { location, strategy })
        })
        .unwrap_or(Resolution {
            location: Location::new(pages.start, 0),
            strategy: Strategy::ChapterStart,
        })
}

/// Locate a chapter-relative offset by walking the chapter's pages.
///
/// Used when only a chapter and an absolute offset are known. Offsets past
/// the end land at the end of the last page; a chapter without pages
/// resolves to the start of the book.
#[must_use]
pub fn resolve_chapter_offset<S: StyledText>(
    model: &BookModel<S>,
    chapter_index: usize,
    chapter_offset: usize,
) -> Location {
    let mut consumed = 0;
    for page_index in model.chapter_pages(chapter_index) {
        let page = &model.pages()[page_index];
        if chapter_offset < consumed + page.character_count || page.is_last_segment {
            let offset = chapter_offset.saturating_sub(consumed).min(page.character_count);
            return Location::new(page_index, offset);
        }
        consumed += page.character_count;
    }
    Location::default()
}

fn exact_snippet<S: StyledText>(model: &BookModel<S>, position: &Position) -> Option<Location> {
    let snippet = normalize_snippet(&position.context_snippet);
    if snippet.is_empty() {
        return None;
    }
    let len = snippet.chars().count();
    search_chapter(model, position, |text| {
        find_chars(&flatten_line_breaks(text), &snippet).map(|hit| (hit, len))
    })
}

fn prefix_snippet<S: StyledText>(model: &BookModel<S>, position: &Position) -> Option<Location> {
    let budget = model.budget();
    let words: Vec<&str> = position
        .context_snippet
        .split_whitespace()
        .take(budget.prefix_words())
        .collect();
    if words.join(" ").chars().count() < budget.prefix_min_chars() {
        return None;
    }
    search_chapter(model, position, |text| find_words(text, &words))
}

fn progress<S: StyledText>(model: &BookModel<S>, position: &Position) -> Option<Location> {
    let len = model.chapter_len(position.chapter_index);
    if len == 0 {
        return None;
    }
    let target = ((position.chapter_progress.clamp(0.0, 1.0) * len as f64).round() as usize).min(len);
    model
        .chapter_pages(position.chapter_index)
        .find(|&i| model.pages()[i].owns_chapter_offset(target))
        .map(|i| Location::new(i, target - model.pages()[i].chapter_range.start))
}

/// Run `find` over the chapter's pages, then refine the first hit with the
/// position's paragraph anchor when it lands inside the matched window.
///
/// `find` returns the page-local start of a match and its length in chars.
fn search_chapter<S: StyledText>(
    model: &BookModel<S>,
    position: &Position,
    find: impl Fn(&str) -> Option<(usize, usize)>,
) -> Option<Location> {
    let radius = model.budget().snippet_radius();

    model
        .chapter_pages(position.chapter_index)
        .find_map(|page_index| {
            let page = &model.pages()[page_index];
            let (hit, matched) = find(page.plain_text())?;

            let anchored = page
                .paragraph_by_index(position.paragraph_index)
                .and_then(|p| p.start().checked_add(position.character_offset))
                .filter(|&o| {
                    o <= page.character_count
                        && o.saturating_add(radius) >= hit
                        && o <= hit.saturating_add(matched).saturating_add(radius)
                });

            Some(Location::new(page_index, anchored.unwrap_or(hit)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookBuilder;
    use crate::budget::SegmentBudget;

    fn model(chapters: &[&str], max: usize) -> BookModel<String> {
        let mut builder = BookBuilder::new(SegmentBudget::new(max).unwrap());
        for (i, text) in chapters.iter().enumerate() {
            builder.add_chapter(&format!("Chapter {}", i + 1), text.to_string());
        }
        builder.finish().model
    }

    #[test]
    fn test_create_clamps_offset() {
        let model = model(&["short text"], 100);
        let position = create_position(&model, 0, 999);
        assert_eq!(position.chapter_progress, 1.0);
        assert_eq!(position.character_offset, 10);
        assert_eq!(position.context_snippet, "short text");
    }

    #[test]
    fn test_create_unknown_page() {
        let model = model(&["text"], 100);
        assert_eq!(create_position(&model, 5, 0), Position::book_start());
    }

    #[test]
    fn test_snippet_is_collapsed() {
        let model = model(&["line one\nline two\nline three"], 100);
        let position = create_position(&model, 0, 9);
        assert!(!position.context_snippet.contains('\n'));
        assert_eq!(position.context_snippet, "line one line two line three");
        assert_eq!(resolve_position(&model, &position), Location::new(0, 9));
    }

    #[test]
    fn test_exact_snippet_wins() {
        let model = model(&["alpha beta gamma delta epsilon"], 100);
        let mut position = Position::chapter_start(0);
        position.context_snippet = "gamma delta".into();
        position.paragraph_index = 42;
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::ExactSnippet);
        assert_eq!(resolution.location, Location::new(0, 11));
    }

    #[test]
    fn test_prefix_snippet_after_edit() {
        let model = model(&["The quick brown fox jumps across the sleepy cat."], 100);
        let mut position = Position::chapter_start(0);
        position.context_snippet = "The quick brown fox jumps over the lazy dog.".into();
        position.paragraph_index = 9;
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::PrefixSnippet);
        assert_eq!(resolution.location, Location::new(0, 0));
    }

    #[test]
    fn test_prefix_snippet_across_blank_line() {
        let model = model(
            &["It was late.\n\nThe rain fell on the roofs of the town, changed"],
            100,
        );
        let mut position = Position::chapter_start(0);
        position.context_snippet = "It was late.  The rain fell on the roofs of the city".into();
        position.paragraph_index = 9;
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::PrefixSnippet);
        assert_eq!(resolution.location, Location::new(0, 0));
    }

    #[test]
    fn test_huge_anchor_offset_does_not_overflow() {
        let model = model(&["alpha\nbeta gamma delta epsilon"], 100);
        let position = Position::decode(
            r#"{"chapterIndex":0,"paragraphIndex":1,"characterOffset":18446744073709551615,"contextSnippet":"gamma delta"}"#,
        )
        .unwrap();
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::ExactSnippet);
        assert_eq!(resolution.location, Location::new(0, 11));
    }

    #[test]
    fn test_short_prefix_is_not_searched() {
        let model = model(&["a b c d e f g h"], 100);
        let mut position = Position::chapter_start(0);
        position.context_snippet = "a b c zzz".into();
        position.chapter_progress = 0.5;
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::Progress);
        assert_eq!(resolution.location, Location::new(0, 8));
    }

    #[test]
    fn test_progress_fallback_across_pages() {
        let text = "x".repeat(1000);
        let model = model(&[&text], 300);
        let mut position = Position::chapter_start(0);
        position.chapter_progress = 0.5;
        let resolution = resolve(&model, &position);
        assert_eq!(resolution.strategy, Strategy::Progress);
        assert_eq!(resolution.location, Location::new(1, 200));
    }

    #[test]
    fn test_progress_one_is_end_of_last_page() {
        let model = model(&["x".repeat(250).as_str()], 100);
        let mut position = Position::chapter_start(0);
        position.chapter_progress = 1.0;
        assert_eq!(resolve_position(&model, &position), Location::new(2, 50));
    }

    #[test]
    fn test_empty_snippet_zero_progress_is_chapter_start() {
        let model = model(&["first", "second chapter"], 100);
        let position = Position::chapter_start(1);
        assert_eq!(resolve_position(&model, &position), Location::new(1, 0));
    }

    #[test]
    fn test_missing_chapter_is_book_start() {
        let model = model(&["only"], 100);
        let resolution = resolve(&model, &Position::chapter_start(9));
        assert_eq!(resolution.strategy, Strategy::BookStart);
        assert_eq!(resolution.location, Location::new(0, 0));
    }

    #[test]
    fn test_empty_model() {
        let model = model(&[], 100);
        assert_eq!(resolve_position(&model, &Position::book_start()), Location::new(0, 0));
        assert_eq!(create_position(&model, 0, 0), Position::book_start());
    }

    #[test]
    fn test_legacy_chapter_offset() {
        let text = "y".repeat(250);
        let model = model(&["intro", &text], 100);
        assert_eq!(resolve_chapter_offset(&model, 1, 0), Location::new(1, 0));
        assert_eq!(resolve_chapter_offset(&model, 1, 150), Location::new(2, 50));
        assert_eq!(resolve_chapter_offset(&model, 1, 250), Location::new(3, 50));
        assert_eq!(resolve_chapter_offset(&model, 1, 9999), Location::new(3, 50));
        assert_eq!(resolve_chapter_offset(&model, 7, 10), Location::new(0, 0));
    }

    #[test]
    fn test_anchor_fallbacks() {
        let model = model(&["abc\ndef"], 100);
        let page = &model.pages()[0];
        assert!(matches!(Anchor::for_offset(page, 5), Anchor::Containing(p) if p.index == 1));
        assert!(matches!(Anchor::for_offset(page, 7), Anchor::LastOnPage(p) if p.index == 1));

        let mut bare = page.clone();
        bare.paragraphs.clear();
        assert_eq!(Anchor::for_offset(&bare, 3), Anchor::Synthetic);
        assert_eq!(Anchor::Synthetic.index(), 0);
    }
}
