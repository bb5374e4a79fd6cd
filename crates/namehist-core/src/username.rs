//! Username normalization and derived display values.

/// Base URL of the avatar service used for placeholder images.
pub const AVATAR_BASE_URL: &str = "https://unavatar.io/twitter";

/// Normalize user input into a bare handle.
///
/// Trims whitespace and strips any leading `@`. Returns `None` when nothing
/// is left.
#[must_use]
pub fn normalize_username(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_start_matches('@').trim();
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

/// Derive a human-readable display name from a handle.
///
/// Splits on `_`, `.` and `-`, capitalizes the first letter of every word
/// and joins the words with single spaces: `weird_user.name` becomes
/// `Weird User Name`. Empty segments (from `a__b`) are dropped.
#[must_use]
pub fn format_display_name(username: &str) -> String {
    username
        .split(['_', '.', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic avatar URL for a handle; always resolves to some image.
#[must_use]
pub fn placeholder_avatar_url(username: &str) -> String {
    format!("{AVATAR_BASE_URL}/{username}")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
