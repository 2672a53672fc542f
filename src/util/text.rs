/// Default number of characters kept by [`abbreviate`] for key fields.
pub const KEY_PREVIEW_CHARS: usize = 30;

/// Keep the first `max_chars` characters of `text` followed by `...`.
///
/// Strings no longer than `max_chars` are returned unchanged. Counting is by
/// `char`, so multi-byte text is never split inside a code point.
#[must_use]
pub fn abbreviate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
