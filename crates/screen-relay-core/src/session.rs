//! Session identity and per-session records.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::RegistryError;

const MIN_ID_LEN: usize = 3;
const MAX_ID_LEN: usize = 64;

/// Validated session identifier.
///
/// Agents choose their own identifiers. Only ASCII letters, digits,
/// underscore and hyphen are accepted, 3 to 64 characters, so a valid
/// identifier can be embedded in a file name or URL as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Parse and normalize a raw identifier.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidId`] if the trimmed value does not
    /// match the allowed pattern.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let trimmed = raw.trim();
        let len_ok = (MIN_ID_LEN..=MAX_ID_LEN).contains(&trimmed.len());
        let charset_ok = trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if len_ok && charset_ok {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(RegistryError::InvalidId(raw.to_string()))
        }
    }

    /// The validated identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this session's frame blob.
    #[must_use]
    pub fn frame_file(&self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Per-session state owned by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session identifier.
    pub session_id: SessionId,
    /// Last successful register or upload (epoch milliseconds).
    pub last_seen: i64,
    /// Frame blob file name. Fixed at creation, never changes.
    pub frame_file: String,
    /// Client-supplied descriptive metadata, opaque to the relay.
    #[serde(default)]
    pub meta: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_charset() {
        for raw in ["abc", "sess_a1", "A-b_C-9", "x".repeat(64).as_str()] {
            let id = SessionId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = SessionId::parse("  sess_a1\n").unwrap();
        assert_eq!(id.as_str(), "sess_a1");
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(SessionId::parse("").is_err());
        assert!(SessionId::parse("ab").is_err());
        assert!(SessionId::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn rejects_disallowed_characters() {
        for raw in [
            "../../etc/passwd",
            "a b c",
            "id.jpg",
            "sess/one",
            "sess\\one",
            "naïve",
            "id%20x",
        ] {
            assert!(SessionId::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn frame_file_is_deterministic() {
        let id = SessionId::parse("sess_a1").unwrap();
        assert_eq!(id.frame_file(), "sess_a1.jpg");
        assert_eq!(id.frame_file(), SessionId::parse("sess_a1").unwrap().frame_file());
    }
}
