//! Identifier newtypes with smart constructors.
//!
//! Identifiers end up embedded in URL paths, so they are validated at
//! construction time. Raw constructors are never exported.

use std::fmt;
use thiserror::Error;

/// Docker container identifier or name.
///
/// Accepts what the Docker daemon accepts for names and ids:
/// `[a-zA-Z0-9][a-zA-Z0-9_.-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    /// Smart constructor: validates a non-empty, path-safe identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidContainerId> {
        let raw = raw.into();
        let mut chars = raw.chars();

        match chars.next() {
            None => return Err(InvalidContainerId::Empty),
            Some(first) if !first.is_ascii_alphanumeric() => {
                return Err(InvalidContainerId::BadCharacter { id: raw, ch: first });
            }
            Some(_) => {}
        }

        if let Some(ch) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))) {
            return Err(InvalidContainerId::BadCharacter { id: raw, ch });
        }

        Ok(Self(raw))
    }

    /// The id as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected container identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidContainerId {
    /// The id is empty or whitespace.
    #[error("container id must not be empty")]
    Empty,

    /// The id contains a character outside `[A-Za-z0-9_.-]`.
    #[error("container id {id:?} contains invalid character {ch:?}")]
    BadCharacter {
        /// The rejected id.
        id: String,
        /// First offending character.
        ch: char,
    },
}
