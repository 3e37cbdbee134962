//! Page blob encoding and page-match localization.
//!
//! Paginated records store a single text blob of the form
//! `|PAGE:1|<text>|PAGE:2|<text>...`, each page truncated to a character cap.
//! At query time the blob is scanned for pages containing any query term.
//! This is a containment heuristic over the truncated copy; relevance
//! scoring always uses the full content.

use std::collections::BTreeSet;

/// Header that opens every page in the blob.
pub const PAGE_MARKER: &str = "|PAGE:";

/// Encodes page texts into the stored blob, keeping `cap` characters per page.
///
/// The delimiter character is replaced in page text so content cannot forge a
/// page header.
pub fn encode_pages(pages: &[String], cap: usize) -> String {
    let mut blob = String::new();
    for (index, page) in pages.iter().enumerate() {
        blob.push_str(PAGE_MARKER);
        blob.push_str(&(index + 1).to_string());
        blob.push('|');
        blob.extend(
            page.chars()
                .take(cap)
                .map(|c| if c == '|' { ' ' } else { c }),
        );
    }
    blob
}

/// Returns the ascending, distinct page numbers whose text contains any term.
///
/// `terms` must already be cleaned with [`clean_terms`]. Segments whose page
/// number does not parse are ignored.
pub fn matching_pages(blob: &str, terms: &[String]) -> Vec<u32> {
    if terms.is_empty() {
        return Vec::new();
    }

    let mut pages = BTreeSet::new();
    for segment in blob.split(PAGE_MARKER) {
        let Some((number, text)) = segment.split_once('|') else {
            continue;
        };
        let Ok(number) = number.trim().parse::<u32>() else {
            continue;
        };
        let text = text.to_lowercase();
        if terms.iter().any(|term| text.contains(term.as_str())) {
            pages.insert(number);
        }
    }
    pages.into_iter().collect()
}

/// Normalizes words for containment matching.
///
/// Lowercases, strips non-alphanumeric characters (`U.S.` becomes `us`),
/// splits on whitespace and removes duplicates while keeping first-seen order.
pub fn clean_terms<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut terms = Vec::new();
    for word in words {
        let cleaned: String = word
            .as_ref()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        for part in cleaned.split_whitespace() {
            if seen.insert(part.to_string()) {
                terms.push(part.to_string());
            }
        }
    }
    terms
}
