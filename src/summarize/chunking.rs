//! Fixed-size text chunking.

/// Split `text` into consecutive slices of at most `max_chars` characters.
///
/// Splitting ignores word and sentence boundaries. Concatenating the chunks
/// in order yields `text` again, and a text of `n` characters produces
/// `ceil(n / max_chars)` chunks. A `max_chars` of zero is treated as one.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
