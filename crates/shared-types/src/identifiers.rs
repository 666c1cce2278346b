//! # SQL Identifiers
//!
//! Table and column names cannot be bound as query parameters, so they are
//! validated here and always emitted double-quoted.

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PostgreSQL truncates identifiers longer than this (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// A table or column name restricted to `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Validate and wrap an identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        let invalid = |reason| TypeError::InvalidIdentifier {
            value: value.clone(),
            reason,
        };

        let mut chars = value.chars();
        let first = chars.next().ok_or_else(|| invalid("empty"))?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid("must start with a letter or underscore"));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("only ASCII letters, digits and underscores are allowed"));
        }
        if value.len() > MAX_IDENTIFIER_LEN {
            return Err(invalid("longer than 63 bytes"));
        }

        Ok(Self(value))
    }

    /// Wrap a compile-time constant. Only for literals known to be valid.
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::new(value).is_ok(), "invalid static identifier {value:?}");
        Self(value.to_string())
    }

    /// Raw identifier text, e.g. for `pg_get_serial_sequence` arguments.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for interpolation into SQL text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SqlIdentifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SqlIdentifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SqlIdentifier> for String {
    fn from(value: SqlIdentifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_schema_names() {
        for name in ["kategori", "nama", "createdAt", "_private", "t1"] {
            assert!(SqlIdentifier::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_rejects_injection_attempts() {
        for name in ["", "1abc", "kategori; DROP TABLE pengguna", "a\"b", "nama-lengkap", "ké"] {
            assert!(
                matches!(SqlIdentifier::new(name), Err(TypeError::InvalidIdentifier { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_identifier() {
        let name = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(SqlIdentifier::new(name).is_err());
        assert!(SqlIdentifier::new("a".repeat(MAX_IDENTIFIER_LEN)).is_ok());
    }

    #[test]
    fn test_quoted_preserves_case() {
        let ident = SqlIdentifier::new("createdAt").unwrap();
        assert_eq!(ident.quoted(), "\"createdAt\"");
        assert_eq!(ident.to_string(), "createdAt");
    }

    #[test]
    fn test_serde_validates() {
        let ok: SqlIdentifier = serde_json::from_str("\"kategori\"").unwrap();
        assert_eq!(ok.as_str(), "kategori");

        let bad: Result<SqlIdentifier, _> = serde_json::from_str("\"drop table\"");
        assert!(bad.is_err());
    }
}
