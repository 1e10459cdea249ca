//! Driving port for owner-scoped todo mutations.

use async_trait::async_trait;

use crate::domain::{Description, Error, OwnerId, Todo, TodoId};

/// Domain use-case port for creating, toggling, and deleting todos.
///
/// `toggle_todo` and `delete_todo` report a miss as `Ok(false)`: an unknown
/// id and another owner's id are indistinguishable to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a todo for `owner`.
    async fn create_todo(&self, owner: &OwnerId, description: Description) -> Result<Todo, Error>;

    /// Flip the completion flag of one of `owner`'s todos.
    async fn toggle_todo(&self, owner: &OwnerId, id: TodoId) -> Result<bool, Error>;

    /// Permanently remove one of `owner`'s todos.
    async fn delete_todo(&self, owner: &OwnerId, id: TodoId) -> Result<bool, Error>;
}
