//! Page offset map.
//!
//! Records where each page starts inside the concatenated
//! document text so that any character offset can be mapped back
//! to the page it came from. Offsets count `char`s, matching the
//! splitter's indexing.

use crate::core::types::PageEntry;

/// Ordered page entries for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMap {
    entries: Vec<PageEntry>,
}

impl PageMap {
    /// Build the map from per-page texts in page order.
    ///
    /// Empty pages are kept; they share their offset with the
    /// following page.
    pub fn build<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut offset = 0;
        let entries = pages
            .into_iter()
            .enumerate()
            .map(|(page_number, text)| {
                let text = text.into();
                let entry = PageEntry {
                    page_number,
                    char_offset: offset,
                    text,
                };
                offset += entry.text.chars().count();
                entry
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total characters across all pages
    pub fn total_chars(&self) -> usize {
        self.entries
            .last()
            .map(|last| last.char_offset + last.text.chars().count())
            .unwrap_or(0)
    }

    /// Concatenate all page texts as chars
    pub fn full_text(&self) -> Vec<char> {
        self.entries.iter().flat_map(|p| p.text.chars()).collect()
    }

    /// Page offsets in page order
    pub fn offsets(&self) -> Vec<usize> {
        self.entries.iter().map(|p| p.char_offset).collect()
    }

    /// Map a character offset to the index of the page containing it.
    ///
    /// Returns the `i` with `offset[i] <= offset < offset[i + 1]`,
    /// or the last page for offsets at or past the final page
    /// start.
    pub fn find_page(&self, offset: usize) -> usize {
        self.entries
            .partition_point(|entry| entry.char_offset <= offset)
            .saturating_sub(1)
    }
}

/// Page lookup over a precomputed offset list.
///
/// Empty pages never match: with equal offsets the later page
/// wins, as it is the one actually holding the character.
pub fn find_page(offsets: &[usize], offset: usize) -> usize {
    offsets
        .partition_point(|&page_start| page_start <= offset)
        .saturating_sub(1)
}
