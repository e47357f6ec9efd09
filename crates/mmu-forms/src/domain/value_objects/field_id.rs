//! Field identifier value object

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum identifier length
const MAX_LEN: usize = 64;

/// Field identifier, unique within a template
///
/// # Invariants
/// - Must be non-empty
/// - Max 64 characters
/// - ASCII alphanumeric plus `_`, `-` and `.`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    /// Create a validated field id
    pub fn new(id: impl Into<String>) -> Result<Self, FieldIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(FieldIdError::Empty);
        }
        if id.len() > MAX_LEN {
            return Err(FieldIdError::TooLong(id.len()));
        }
        if let Some(c) = id.chars().find(|c| !Self::is_allowed(*c)) {
            return Err(FieldIdError::InvalidCharacter(c));
        }

        Ok(Self(id))
    }

    /// Create a field id without validation (templates re-check on build)
    pub(crate) fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
    }
}

impl TryFrom<String> for FieldId {
    type Error = FieldIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldIdError {
    #[error("cannot be empty")]
    Empty,

    #[error("max 64 characters, got {0}")]
    TooLong(usize),

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}
