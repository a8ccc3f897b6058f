//! Truncated excerpts shown beside the session state

/// Maximum characters of transcription kept in the preview
pub const PREVIEW_MAX_CHARS: usize = 50;

/// Maximum characters of an error message kept for display
pub const ERROR_MAX_CHARS: usize = 40;

/// Marker appended to a truncated preview
pub const ELLIPSIS: &str = "...";

/// Preview excerpt: the first 50 characters, plus `...` when cut.
pub fn preview_excerpt(text: &str) -> String {
    match char_boundary(text, PREVIEW_MAX_CHARS) {
        Some(end) => format!("{}{}", &text[..end], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Error excerpt: the first 40 characters, no marker.
pub fn error_excerpt(message: &str) -> String {
    match char_boundary(message, ERROR_MAX_CHARS) {
        Some(end) => message[..end].to_string(),
        None => message.to_string(),
    }
}

/// Byte offset after `max` chars, or `None` if the text is not longer than `max`.
fn char_boundary(text: &str, max: usize) -> Option<usize> {
    text.char_indices().nth(max).map(|(offset, _)| offset)
}
