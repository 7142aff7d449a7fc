//! Validated text for patient and visit forms.
//!
//! Both types trim their input once, at construction, and (de)serialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("Text cannot be empty")]
    Empty,
    #[error("Invalid email address")]
    InvalidEmail,
}

fn trimmed_non_empty(input: &str) -> Result<&str, TextError> {
    match input.trim() {
        "" => Err(TextError::Empty),
        text => Ok(text),
    }
}

/// Text with at least one non-whitespace character, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        trimmed_non_empty(input.as_ref()).map(|text| Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// An address of the form `local@domain.tld`.
///
/// The domain must contain a dot, which is also what the backend's validator requires.
/// Anything deeper is left to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let text = trimmed_non_empty(input.as_ref())?;
        let well_formed = match text.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.split('.').count() > 1
                    && domain.split('.').all(|label| !label.is_empty())
                    && !text.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !well_formed {
            return Err(TextError::InvalidEmail);
        }
        Ok(Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident, $ctor:ident) => {
        impl TryFrom<String> for $ty {
            type Error = TextError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $ty::$ctor(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype_impls!(NonEmptyText, new);
string_newtype_impls!(EmailAddress, parse);
