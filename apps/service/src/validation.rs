//! Input validation and sterilization for target registration.
//!
//! Everything a caller submits passes through here before it touches
//! storage: length and ASCII limits, the http/https scheme requirement,
//! and quote doubling so values are safe to embed in SQL text columns.

use url::Url;

use crate::error::ValidationError;

/// Maximum length of a target's display name.
pub const MAX_NAME_LEN: usize = 40;
/// Maximum length of a target's URL.
pub const MAX_URL_LEN: usize = 256;

/// Validate a user-supplied string and return its sterilized form.
///
/// Rejects empty, overlong, or non-ASCII input. Embedded single quotes
/// are doubled so the value can be stored in SQLite text columns without
/// breaking quoting.
pub fn validate_and_sterilize(input: &str, max_len: usize) -> Result<String, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::Empty);
    }
    if input.len() > max_len {
        return Err(ValidationError::TooLong { max: max_len });
    }
    if !input.is_ascii() {
        return Err(ValidationError::NonAscii);
    }

    Ok(input.replace('\'', "''"))
}

/// Validate a target URL and return the sterilized form.
///
/// The URL must carry an explicit lowercase `http://` or `https://`
/// prefix and must parse as a URL. Sterilization happens after parsing
/// so the parser sees the original input.
pub fn validate_url(input: &str) -> Result<String, ValidationError> {
    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Err(ValidationError::UnsupportedScheme);
    }

    Url::parse(input).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    validate_and_sterilize(input, MAX_URL_LEN)
}
