//! Identifier types for line-billing.
//!
//! A phone line is identified by its number, written `ddd-dddd`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A phone number in `ddd-dddd` form.
///
/// Numbers identify phone lines in call datasets and reports.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Return the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, line) = s
            .split_once('-')
            .ok_or_else(|| IdError::InvalidPhoneNumber(s.to_string()))?;

        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(prefix, 3) || !digits(line, 4) {
            return Err(IdError::InvalidPhoneNumber(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhoneNumber> for String {
    fn from(number: PhoneNumber) -> Self {
        number.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a `ddd-dddd` phone number.
    #[error("invalid phone number: {0:?}")]
    InvalidPhoneNumber(String),
}
