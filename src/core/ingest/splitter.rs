//! Sentence-aware document splitting.
//!
//! Splits the concatenated text of a [`PageMap`] into overlapping
//! sections of roughly `max_section_length` characters. A section
//! end is moved forward to the next sentence ending when one is
//! within `sentence_search_limit` characters, or back to the last
//! word break otherwise. A section start is moved backward to the
//! previous sentence ending or word break. When a section stops
//! inside an HTML table, the next one restarts at the `<table` tag
//! so the table is not cut in half.
//!
//! All positions are `char` indices into the concatenated text,
//! so multi-byte input never produces an invalid slice.
//!
//! # Example
//!
//! ```
//! use docindex::core::ingest::{PageMap, TextSplitter};
//!
//! let pages = PageMap::build(["First page. ", "Second page."]);
//! let splitter = TextSplitter::default();
//!
//! let segments: Vec<_> = splitter.split(&pages).collect();
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].text, "First page. Second page.");
//! assert_eq!(segments[0].page, 0);
//! ```

use crate::core::config::SplittingConfig;
use crate::core::ingest::page_map::{find_page, PageMap};

/// Characters that end a sentence
pub const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Characters a section may break on when no sentence ending is near.
/// Line breaks are not among them.
pub const WORD_BREAKS: [char; 11] = [',', ';', ':', ' ', '(', ')', '[', ']', '{', '}', '\t'];

const TABLE_OPEN: &str = "<table";
const TABLE_CLOSE: &str = "</table";

fn is_sentence_end(c: char) -> bool {
    SENTENCE_ENDINGS.contains(&c)
}

fn is_word_break(c: char) -> bool {
    WORD_BREAKS.contains(&c)
}

/// One section of text produced by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Section text
    pub text: String,

    /// Index of the page the section starts on
    pub page: usize,

    /// Char offset of the first character
    pub start: usize,

    /// Char offset one past the last character
    pub end: usize,
}

/// Splitter settings. Lengths are measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    max_section_length: usize,
    sentence_search_limit: usize,
    section_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 100, 100)
    }
}

impl TextSplitter {
    /// Create a splitter.
    ///
    /// # Panics
    ///
    /// Panics if `max_section_length` is 0 or if
    /// `section_overlap >= max_section_length`; either would stop
    /// the cursor from advancing.
    pub fn new(
        max_section_length: usize,
        sentence_search_limit: usize,
        section_overlap: usize,
    ) -> Self {
        assert!(max_section_length > 0, "max_section_length must be > 0");
        assert!(
            section_overlap < max_section_length,
            "section_overlap must be < max_section_length"
        );

        Self {
            max_section_length,
            sentence_search_limit,
            section_overlap,
        }
    }

    /// Create a splitter from validated configuration
    pub fn from_config(config: &SplittingConfig) -> Self {
        Self::new(
            config.max_section_length,
            config.sentence_search_limit,
            config.section_overlap,
        )
    }

    pub fn max_section_length(&self) -> usize {
        self.max_section_length
    }

    pub fn sentence_search_limit(&self) -> usize {
        self.sentence_search_limit
    }

    pub fn section_overlap(&self) -> usize {
        self.section_overlap
    }

    /// Lazily split a document into sections
    pub fn split(&self, page_map: &PageMap) -> Segments {
        let text = page_map.full_text();
        let end = text.len();
        Segments {
            splitter: *self,
            text,
            offsets: page_map.offsets(),
            start: 0,
            end,
            emitted: 0,
            finished: false,
        }
    }

    /// Extend a tentative section end to a sentence ending or word break.
    fn find_section_end(&self, text: &[char], start: usize) -> usize {
        let length = text.len();
        let mut end = start + self.max_section_length;
        if end > length {
            return length;
        }

        let mut last_word = None;
        while end < length
            && end - start - self.max_section_length < self.sentence_search_limit
            && !is_sentence_end(text[end])
        {
            if is_word_break(text[end]) {
                last_word = Some(end);
            }
            end += 1;
        }

        if end < length && !is_sentence_end(text[end]) {
            if let Some(word) = last_word {
                end = word;
            }
        }

        // Keep the terminator (or word break) in this section
        if end < length {
            end += 1;
        }
        end
    }

    /// Move a section start back to a sentence ending or word break.
    ///
    /// The scan window is bounded by the current `end`, not by the
    /// previous section's end.
    fn find_section_start(&self, text: &[char], start: usize, end: usize) -> usize {
        let reach = self.max_section_length + 2 * self.sentence_search_limit;
        let mut start = start;
        let mut last_word = None;

        while start > 0 && start + reach > end && !is_sentence_end(text[start]) {
            if is_word_break(text[start]) {
                last_word = Some(start);
            }
            start -= 1;
        }

        if !is_sentence_end(text[start]) {
            if let Some(word) = last_word {
                start = word;
            }
        }

        // Skip the delimiter itself
        if start > 0 {
            start += 1;
        }
        start
    }

    /// Cursor for the next section after emitting `section` at `start..end`.
    ///
    /// A section holding an unclosed `<table` more than twice the
    /// search limit into it restarts the next section at the tag,
    /// unless that would not move past `previous` (the cursor this
    /// section started from).
    fn next_section_start(
        &self,
        section: &[char],
        previous: usize,
        start: usize,
        end: usize,
    ) -> usize {
        let standard = end - self.section_overlap;

        let open = rfind_chars(section, TABLE_OPEN);
        let close = rfind_chars(section, TABLE_CLOSE);
        match open {
            Some(pos)
                if pos > 2 * self.sentence_search_limit && close.map_or(true, |c| pos > c) =>
            {
                let table_start = standard.min(start + pos);
                if table_start > previous {
                    table_start
                } else {
                    standard
                }
            }
            _ => standard,
        }
    }
}

/// Iterator over the sections of one document.
///
/// Produced by [`TextSplitter::split`]. Finite and not restartable.
#[derive(Debug)]
pub struct Segments {
    splitter: TextSplitter,
    text: Vec<char>,
    offsets: Vec<usize>,
    start: usize,
    end: usize,
    emitted: usize,
    finished: bool,
}

impl Segments {
    fn segment(&self, start: usize, end: usize) -> Segment {
        Segment {
            text: self.text[start..end].iter().collect(),
            page: find_page(&self.offsets, start),
            start,
            end,
        }
    }
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.finished {
            return None;
        }

        let length = self.text.len();
        let splitter = self.splitter;

        if self.start + splitter.section_overlap < length {
            let previous = self.start;
            let end = splitter.find_section_end(&self.text, previous);
            let start = splitter.find_section_start(&self.text, previous, end);
            let segment = self.segment(start, end);

            let next = splitter.next_section_start(&self.text[start..end], previous, start, end);
            assert!(
                next > previous,
                "section cursor must advance (was {previous}, next {next})"
            );

            self.start = next;
            self.end = end;
            self.emitted += 1;
            return Some(segment);
        }

        self.finished = true;

        // A document no longer than the overlap still becomes one section
        let whole_short_document = self.emitted == 0 && length > 0;
        if whole_short_document || self.start + splitter.section_overlap < self.end {
            self.emitted += 1;
            return Some(self.segment(self.start, self.end));
        }
        None
    }
}

/// Char index of the last occurrence of `needle` in `haystack`
fn rfind_chars(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| haystack[i..i + needle.len()] == needle[..])
}
