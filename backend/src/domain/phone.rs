//! Canonical phone keys.

/// Strip every character that is not an ASCII digit.
///
/// The result is the identity key used for duplicate detection. Empty input
/// yields an empty key, and applying the function twice changes nothing.
///
/// # Examples
/// ```
/// use contact_registry::domain::normalize_phone;
///
/// assert_eq!(normalize_phone("(11) 99999-0000"), "11999990000");
/// assert_eq!(normalize_phone(""), "");
/// ```
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
