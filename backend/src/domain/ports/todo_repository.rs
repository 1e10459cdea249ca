//! Driven port for todo persistence adapters and their errors.
//!
//! Every operation takes the caller's [`OwnerId`]; adapters must include it in
//! the row filter of every statement. That filter is the whole authorisation
//! model.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Description, OwnerId, Todo, TodoId};

/// Persistence errors raised by todo repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoPersistenceError {
    /// Repository connection could not be established.
    #[error("todo repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("todo repository query failed: {message}")]
    Query { message: String },
}

impl TodoPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for owner-scoped todo storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos belonging to `owner`, ascending by id. Empty when none exist.
    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Todo>, TodoPersistenceError>;

    /// Insert a new, not yet completed todo and return it with its id.
    async fn insert(
        &self,
        owner: &OwnerId,
        description: &Description,
    ) -> Result<Todo, TodoPersistenceError>;

    /// Flip `completed` on the row matching both `id` and `owner`.
    ///
    /// Returns `true` iff a row matched.
    async fn toggle_completed(
        &self,
        owner: &OwnerId,
        id: TodoId,
    ) -> Result<bool, TodoPersistenceError>;

    /// Remove the row matching both `id` and `owner`.
    ///
    /// Returns `true` iff a row matched.
    async fn delete(&self, owner: &OwnerId, id: TodoId) -> Result<bool, TodoPersistenceError>;
}

#[derive(Debug, Default)]
struct FixtureState {
    next_id: i64,
    rows: Vec<(OwnerId, Todo)>,
}

/// In-memory repository for handler tests and local experiments.
///
/// Ids are assigned from 1 upwards and never reused, mirroring SQLite
/// `AUTOINCREMENT`.
#[derive(Debug, Default)]
pub struct FixtureTodoRepository {
    state: Mutex<FixtureState>,
}

impl FixtureTodoRepository {
    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut FixtureState) -> T,
    ) -> Result<T, TodoPersistenceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TodoPersistenceError::connection("fixture state poisoned"))?;
        Ok(f(&mut state))
    }
}

#[async_trait]
impl TodoRepository for FixtureTodoRepository {
    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Todo>, TodoPersistenceError> {
        self.with_state(|state| {
            // Rows are appended in id order, so no sort is needed.
            state
                .rows
                .iter()
                .filter(|(row_owner, _)| row_owner == owner)
                .map(|(_, todo)| todo.clone())
                .collect()
        })
    }

    async fn insert(
        &self,
        owner: &OwnerId,
        description: &Description,
    ) -> Result<Todo, TodoPersistenceError> {
        self.with_state(|state| {
            state.next_id += 1;
            let todo = Todo::created(TodoId::new(state.next_id), description.clone());
            state.rows.push((owner.clone(), todo.clone()));
            todo
        })
    }

    async fn toggle_completed(
        &self,
        owner: &OwnerId,
        id: TodoId,
    ) -> Result<bool, TodoPersistenceError> {
        self.with_state(|state| {
            match state
                .rows
                .iter_mut()
                .find(|(row_owner, todo)| row_owner == owner && todo.id == id)
            {
                Some((_, todo)) => {
                    todo.completed = !todo.completed;
                    true
                }
                None => false,
            }
        })
    }

    async fn delete(&self, owner: &OwnerId, id: TodoId) -> Result<bool, TodoPersistenceError> {
        self.with_state(|state| {
            let before = state.rows.len();
            state
                .rows
                .retain(|(row_owner, todo)| !(row_owner == owner && todo.id == id));
            state.rows.len() != before
        })
    }
}
