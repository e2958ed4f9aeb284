//! SQL identifier handling.
//!
//! Table and column names are interpolated into SQL text and into generated
//! source, so they are checked against a plain identifier grammar first:
//! an ASCII letter or `_`, followed by ASCII letters, digits or `_`.

use crate::{Error, Result};

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Return `name` unchanged when it is a valid identifier.
pub fn validate(name: &str) -> Result<&str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quote an identifier for use in SQL text.
pub fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Upper-case the first character, leave the rest as is.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
