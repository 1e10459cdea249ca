//! Todo item model.
//!
//! Todos are owned by exactly one [`OwnerId`](super::OwnerId), but the owner is
//! never part of the serialised shape: envelopes only ever describe the
//! caller's own items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wrap a raw row identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw row identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors returned by [`Description::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionValidationError {
    Empty,
}

impl fmt::Display for DescriptionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "description must not be empty"),
        }
    }
}

impl std::error::Error for DescriptionValidationError {}

/// Todo description text; immutable once created.
///
/// The text is stored exactly as submitted. Only whitespace-only input is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Validate and construct a description.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::Description;
    ///
    /// assert!(Description::new("Buy milk").is_ok());
    /// assert!(Description::new("   ").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, DescriptionValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DescriptionValidationError::Empty);
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

impl TryFrom<String> for Description {
    type Error = DescriptionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A todo item as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub description: Description,
    pub completed: bool,
}

impl Todo {
    /// A freshly created, not yet completed item.
    #[must_use]
    pub fn created(id: TodoId, description: Description) -> Self {
        Self {
            id,
            description,
            completed: false,
        }
    }
}
