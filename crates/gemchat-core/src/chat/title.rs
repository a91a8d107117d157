//! Session title derivation.
//!
//! A session's title is its first message, cut to [`TITLE_MAX_CHARS`]
//! characters with a trailing ellipsis when anything was cut.

/// Maximum number of characters kept from the first message.
pub const TITLE_MAX_CHARS: usize = 40;

/// Appended when the first message was longer than [`TITLE_MAX_CHARS`].
pub const TITLE_ELLIPSIS: char = '…';

/// Derive a session title from the text of its first message.
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a
/// character.
pub fn derive_title(first_message: &str) -> String {
    let mut chars = first_message.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push(TITLE_ELLIPSIS);
    }
    title
}
