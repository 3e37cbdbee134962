//! Snippet extraction from stored content.

/// Marker added where the snippet window cuts the content.
const ELLIPSIS: &str = "...";

/// Builds a snippet of `window` characters around the first occurrence of any term.
///
/// `terms` are cleaned lowercase words. The window starts a third of its
/// length before the match and is clamped to the content; when no term is
/// found it starts at the beginning. Whitespace runs collapse to one space.
pub fn make_snippet(content: &str, terms: &[String], window: usize) -> String {
    if content.is_empty() || window == 0 {
        return String::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&c| fold(c)).collect();

    let hit = terms
        .iter()
        .filter_map(|term| find_chars(&folded, term))
        .min()
        .unwrap_or(0);

    let len = chars.len();
    let mut start = hit.saturating_sub(window / 3);
    let end = (start + window).min(len);
    if end - start < window {
        start = end.saturating_sub(window);
    }

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&collapse_whitespace(&chars[start..end]));
    if end < len {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Lowercases one character, keeping it one character wide.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Returns the character index of the first occurrence of `needle`.
fn find_chars(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|candidate| candidate == needle.as_slice())
}

/// Joins the characters with every whitespace run reduced to one space.
fn collapse_whitespace(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut in_space = false;
    for &c in chars {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
