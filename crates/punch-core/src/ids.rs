//! Branded ID newtypes for type safety.
//!
//! Units have no generated identifier: the caller-chosen name is the document
//! key. [`UnitId`] wraps that name so navigation state and repository calls
//! cannot confuse it with an address or a trade name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a unit (its unique name, used directly as the document key).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Create from an existing string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for UnitId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<UnitId> for String {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_deref_match_inner() {
        let id = UnitId::new("A-Unit01");
        assert_eq!(id.to_string(), "A-Unit01");
        assert_eq!(&*id, "A-Unit01");
        assert_eq!(id.as_str(), "A-Unit01");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UnitId::from("B-Unit07");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"B-Unit07\"");
        let back: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn into_string_roundtrip() {
        let s: String = UnitId::from("x".to_string()).into();
        assert_eq!(s, "x");
    }
}
