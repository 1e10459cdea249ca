//! What a handler does when the todo store fails.
//!
//! The page and envelopes have no error slot, so by default a storage failure
//! is logged and replaced by the "nothing happened" result: an empty list,
//! `success: false`, or a failed create. Operators who would rather see the
//! failure can switch to [`StorageFailurePolicy::Surface`].

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::domain::Error;

/// Accepted spellings, for configuration error messages.
pub const STORAGE_POLICY_EXPECTED: &str = "degrade|surface";

/// Storage failure handling at the HTTP edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageFailurePolicy {
    /// Log and substitute an empty result.
    #[default]
    Degrade,
    /// Return the error response (500 or 503).
    Surface,
}

impl StorageFailurePolicy {
    /// Resolve a storage result under this policy.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::Error;
    /// use todo_backend::inbound::http::failure_policy::StorageFailurePolicy;
    ///
    /// let failed: Result<bool, Error> = Err(Error::service_unavailable("locked"));
    /// let outcome = StorageFailurePolicy::Degrade.apply(failed, false, "toggle");
    /// assert_eq!(outcome, Ok(false));
    /// ```
    pub fn apply<T>(
        self,
        result: Result<T, Error>,
        fallback: T,
        operation: &str,
    ) -> Result<T, Error> {
        match (result, self) {
            (Ok(value), _) => Ok(value),
            (Err(err), Self::Degrade) => {
                warn!(
                    operation,
                    code = ?err.code(),
                    error = %err,
                    "storage failure degraded to empty result"
                );
                Ok(fallback)
            }
            (Err(err), Self::Surface) => Err(err),
        }
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown storage failure policy '{0}'")]
pub struct UnknownStoragePolicy(String);

impl FromStr for StorageFailurePolicy {
    type Err = UnknownStoragePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "surface" => Ok(Self::Surface),
            _ => Err(UnknownStoragePolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for StorageFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrade => f.write_str("degrade"),
            Self::Surface => f.write_str("surface"),
        }
    }
}
