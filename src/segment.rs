//! Chapter segmentation.
//!
//! Splits a chapter into pages no longer than the character budget,
//! preferring to cut where a paragraph ends.
//!
//! ## The Algorithm
//!
//! ```text
//! start = 0
//! loop:
//!   target = min(start + max, len)
//!   cut    = last paragraph end in (start, target]      // 1. paragraph
//!         ?? char after last newline in (target-500, target]  // 2. newline
//!         ?? target                                     // 3. hard cut
//!   emit page [start, cut)
//!   start = cut
//! ```
//!
//! Every candidate cut lies strictly after `start`, so each iteration makes
//! progress and the loop terminates.
//!
//! ## Worked Example
//!
//! ```text
//! len = 3200, max = 3000, paragraph ends at 2950 and 3200
//!
//! target = 3000 -> last paragraph end <= 3000 is 2950
//! Page 0: [0, 2950)      2950 chars
//! Page 1: [2950, 3200)    250 chars
//! ```
//!
//! Nothing here depends on fonts or view width, which is why pages survive
//! rotation and resizing unchanged.

use log::debug;

use crate::budget::SegmentBudget;
use crate::page::Page;
use crate::paragraph::Paragraph;
use crate::text::{is_line_break, StyledText};

/// Why a particular cut was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreakKind {
    /// The remaining text fit within the budget.
    EndOfChapter,
    /// Cut at the end of a paragraph.
    Paragraph,
    /// Cut just after a newline found near the target.
    Newline,
    /// No boundary nearby; cut exactly at the budget.
    Hard,
}

/// Splits chapters into bounded [`Page`]s.
///
/// ## Example
///
/// ```rust
/// use folio::{extract_paragraphs, SegmentBudget, Segmenter};
///
/// let text = format!("{}\n{}", "a".repeat(60), "b".repeat(60));
/// let paragraphs = extract_paragraphs(&text);
///
/// let segmenter = Segmenter::new(SegmentBudget::new(100).unwrap());
/// let pages = segmenter.segment(&text, &paragraphs, 0, "Chapter 1");
///
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[0].chapter_range, 0..61);
/// assert_eq!(pages[1].chapter_range, 61..121);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    budget: SegmentBudget,
}

impl Segmenter {
    /// Create a segmenter with the given budget.
    #[must_use]
    pub fn new(budget: SegmentBudget) -> Self {
        Self { budget }
    }

    /// The budget in use.
    #[must_use]
    pub fn budget(&self) -> &SegmentBudget {
        &self.budget
    }

    /// Split `text` into pages.
    ///
    /// `paragraphs` are chapter-relative, sorted and non-overlapping, as
    /// produced by [`extract_paragraphs`](crate::extract_paragraphs). An
    /// empty chapter yields no pages.
    #[must_use]
    pub fn segment<S: StyledText>(
        &self,
        text: &S,
        paragraphs: &[Paragraph],
        chapter_index: usize,
        chapter_title: &str,
    ) -> Vec<Page<S>> {
        let plain = text.plain_text();
        let chars: Vec<char> = plain.chars().collect();
        let len = chars.len();
        // byte start of every char plus the end, so cuts map to bytes in O(1)
        let bytes: Vec<usize> = plain
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(plain.len()))
            .collect();
        if len == 0 {
            return vec![];
        }

        let mut pages = Vec::with_capacity(len.div_ceil(self.budget.max_segment_chars()));
        let mut start = 0;
        let mut hard_cuts = 0;

        while start < len {
            let (cut, kind) = self.find_break(&chars, paragraphs, start);
            if kind == BreakKind::Hard {
                hard_cuts += 1;
            }

            pages.push(Page {
                content: text.slice(bytes[start]..bytes[cut]),
                chapter_index,
                chapter_title: chapter_title.to_string(),
                segment_index: pages.len(),
                is_first_segment: start == 0,
                is_last_segment: cut >= len,
                chapter_range: start..cut,
                paragraphs: rebase_paragraphs(paragraphs, start, cut),
                character_count: cut - start,
            });

            start = cut;
        }

        debug!(
            "segmented chapter {} ({} chars) into {} pages, {} hard cuts",
            chapter_index,
            len,
            pages.len(),
            hard_cuts
        );

        pages
    }

    /// Choose where the segment starting at `start` ends.
    ///
    /// Always returns a cut in `(start, len]`.
    pub(crate) fn find_break(
        &self,
        chars: &[char],
        paragraphs: &[Paragraph],
        start: usize,
    ) -> (usize, BreakKind) {
        let len = chars.len();
        let target = (start + self.budget.max_segment_chars()).min(len);
        if target == len {
            return (len, BreakKind::EndOfChapter);
        }

        let fitting = paragraphs.partition_point(|p| p.end() <= target);
        if let Some(end) = paragraphs[..fitting]
            .last()
            .map(Paragraph::end)
            .filter(|&end| end > start)
        {
            return (end, BreakKind::Paragraph);
        }

        let window_start = target
            .saturating_sub(self.budget.newline_window())
            .max(start);
        if let Some(newline) = chars[window_start..target]
            .iter()
            .rposition(|&c| is_line_break(c))
        {
            return (window_start + newline + 1, BreakKind::Newline);
        }

        (target, BreakKind::Hard)
    }
}

/// Clip the paragraphs overlapping `[start, end)` and shift them to page-local
/// coordinates, keeping their chapter-relative `index`.
fn rebase_paragraphs(paragraphs: &[Paragraph], start: usize, end: usize) -> Vec<Paragraph> {
    let first = paragraphs.partition_point(|p| p.end() <= start);
    paragraphs[first..]
        .iter()
        .take_while(|p| p.start() < end)
        .filter(|p| p.end() > start)
        .map(|p| Paragraph::new(p.start().max(start) - start..p.end().min(end) - start, p.index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paragraph::extract_paragraphs;

    fn segmenter(max: usize) -> Segmenter {
        Segmenter::new(SegmentBudget::new(max).unwrap())
    }

    #[test]
    fn test_empty_chapter() {
        let pages = segmenter(100).segment(&String::new(), &[], 0, "Empty");
        assert!(pages.is_empty());
    }

    #[test]
    fn test_short_chapter_single_page() {
        let text = "x".repeat(500);
        let paragraphs = extract_paragraphs(&text);
        let pages = segmenter(3000).segment(&text, &paragraphs, 4, "Short");

        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_first_segment);
        assert!(pages[0].is_last_segment);
        assert_eq!(pages[0].character_count, 500);
        assert_eq!(pages[0].chapter_index, 4);
        assert_eq!(pages[0].chapter_title, "Short");
    }

    #[test]
    fn test_cuts_at_last_paragraph_end() {
        // paragraph ends at 2950 and 3200
        let text = format!("{}\n{}\n", "a".repeat(2949), "b".repeat(249));
        let paragraphs = extract_paragraphs(&text);
        assert_eq!(paragraphs[0].end(), 2950);
        assert_eq!(paragraphs[1].end(), 3200);

        let pages = segmenter(3000).segment(&text, &paragraphs, 0, "");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].character_count, 2950);
        assert_eq!(pages[1].character_count, 250);
        assert_eq!(pages[1].chapter_range, 2950..3200);
        assert!(!pages[1].is_first_segment);
        assert!(pages[1].is_last_segment);
    }

    #[test]
    fn test_newline_fallback_without_paragraphs() {
        let text = format!("{}\n{}", "a".repeat(80), "b".repeat(80));
        let pages = segmenter(100).segment(&text, &[], 0, "");
        assert_eq!(pages[0].chapter_range, 0..81);
        assert_eq!(pages[1].chapter_range, 81..161);
    }

    #[test]
    fn test_newline_outside_window_is_ignored() {
        let text = format!("{}\n{}", "a".repeat(10), "b".repeat(200));
        let budget = SegmentBudget::new(100).unwrap().with_newline_window(50);
        let (cut, kind) = Segmenter::new(budget).find_break(
            &text.chars().collect::<Vec<_>>(),
            &[],
            0,
        );
        assert_eq!((cut, kind), (100, BreakKind::Hard));
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "z".repeat(250);
        let paragraphs = extract_paragraphs(&text);
        let pages = segmenter(100).segment(&text, &paragraphs, 0, "");

        let spans: Vec<_> = pages.iter().map(|p| p.chapter_range.clone()).collect();
        assert_eq!(spans, vec![0..100, 100..200, 200..250]);
        // the single paragraph straddles every cut
        assert!(pages.iter().all(|p| p.paragraphs.len() == 1));
        assert_eq!(pages[2].paragraphs[0].range, 0..50);
    }

    #[test]
    fn test_paragraphs_rebased_to_page() {
        let text = "aaaa\nbbbb\ncccc\n".repeat(10);
        let paragraphs = extract_paragraphs(&text);
        let pages = segmenter(40).segment(&text, &paragraphs, 0, "");

        for page in &pages {
            let first = &page.paragraphs[0];
            assert_eq!(first.start(), 0);
            assert_eq!(page.paragraphs.last().unwrap().end(), page.character_count);
        }
        assert_eq!(pages[1].paragraphs[0].index, 8);
    }

    #[test]
    fn test_multibyte_counts() {
        let text = "日本語\n".repeat(30);
        let paragraphs = extract_paragraphs(&text);
        let pages = segmenter(10).segment(&text, &paragraphs, 0, "");
        for page in &pages {
            assert!(page.character_count <= 10);
            assert_eq!(page.content.chars().count(), page.character_count);
        }
    }

    #[test]
    fn test_mixed_width_content_matches_chapter_range() {
        let text = "añb日c\u{1F600}d\n".repeat(40);
        let chars: Vec<char> = text.chars().collect();
        let pages = segmenter(25).segment(&text, &extract_paragraphs(&text), 0, "");
        assert!(pages.len() > 1);
        for page in &pages {
            let expected: String = chars[page.chapter_range.clone()].iter().collect();
            assert_eq!(page.content, expected);
        }
    }
}
