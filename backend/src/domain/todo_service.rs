//! Todo domain service implementing the driving ports.
//!
//! The service is a thin mapping layer: it forwards each use-case to the
//! repository and translates persistence failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{TodoCommand, TodoPersistenceError, TodoQuery, TodoRepository};
use crate::domain::{Description, Error, OwnerId, Todo, TodoId};

/// Todo service backed by a [`TodoRepository`].
#[derive(Clone)]
pub struct TodoService<R> {
    repository: Arc<R>,
}

impl<R> TodoService<R> {
    /// Create a new service over the given repository.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_persistence_error(error: TodoPersistenceError) -> Error {
    match error {
        TodoPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("todo repository unavailable: {message}"))
        }
        TodoPersistenceError::Query { message } => {
            Error::internal(format!("todo repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> TodoQuery for TodoService<R>
where
    R: TodoRepository,
{
    async fn list_todos(&self, owner: &OwnerId) -> Result<Vec<Todo>, Error> {
        self.repository
            .list_for_owner(owner)
            .await
            .map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R> TodoCommand for TodoService<R>
where
    R: TodoRepository,
{
    async fn create_todo(&self, owner: &OwnerId, description: Description) -> Result<Todo, Error> {
        let todo = self
            .repository
            .insert(owner, &description)
            .await
            .map_err(map_persistence_error)?;
        debug!(owner = owner.session_prefix(), todo_id = %todo.id, "todo created");
        Ok(todo)
    }

    async fn toggle_todo(&self, owner: &OwnerId, id: TodoId) -> Result<bool, Error> {
        let matched = self
            .repository
            .toggle_completed(owner, id)
            .await
            .map_err(map_persistence_error)?;
        debug!(owner = owner.session_prefix(), todo_id = %id, matched, "todo toggled");
        Ok(matched)
    }

    async fn delete_todo(&self, owner: &OwnerId, id: TodoId) -> Result<bool, Error> {
        let matched = self
            .repository
            .delete(owner, id)
            .await
            .map_err(map_persistence_error)?;
        debug!(owner = owner.session_prefix(), todo_id = %id, matched, "todo deleted");
        Ok(matched)
    }
}
