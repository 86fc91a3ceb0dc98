//! Domain identifier types
//!
//! Newtype wrappers for the identifiers carried by beneficiary records.
//! The person identifier keeps the raw value as stored in the source
//! database and only enforces the 11-digit numeric invariant when it is
//! normalized for the wire.

use super::errors::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a normalized person identifier (CPF)
pub const PERSON_ID_DIGITS: usize = 11;

const PERSON_ID_MAX: u64 = 99_999_999_999;

/// Person identifier (national ID) newtype wrapper
///
/// # Examples
///
/// ```
/// use benesync::domain::ids::PersonId;
///
/// let id = PersonId::new("123");
/// assert_eq!(id.normalized().unwrap(), "00000000123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    /// Creates a new PersonId from the raw stored value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the identifier as an 11-digit, left-zero-padded decimal string
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Format`] if the stored value is not an unsigned
    /// integer of at most 11 digits.
    pub fn normalized(&self) -> Result<String, SyncError> {
        let trimmed = self.0.trim();
        let value: u64 = trimmed.parse().map_err(|_| {
            SyncError::Format(format!("person identifier '{}' is not numeric", self.0))
        })?;

        if value > PERSON_ID_MAX {
            return Err(SyncError::Format(format!(
                "person identifier '{}' exceeds {PERSON_ID_DIGITS} digits",
                self.0
            )));
        }

        Ok(format!("{value:0width$}", width = PERSON_ID_DIGITS))
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
