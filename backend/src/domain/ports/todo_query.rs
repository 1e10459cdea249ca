//! Driving port for owner-scoped todo reads.
//!
//! Inbound adapters depend on this trait rather than on a repository so they
//! receive domain errors and never see persistence details.

use async_trait::async_trait;

use crate::domain::{Error, OwnerId, Todo};

/// Domain use-case port for listing todos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// Return the caller's todos in ascending id order.
    async fn list_todos(&self, owner: &OwnerId) -> Result<Vec<Todo>, Error>;
}
