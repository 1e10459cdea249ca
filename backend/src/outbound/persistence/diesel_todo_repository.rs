//! SQLite-backed `TodoRepository` implementation using Diesel ORM.
//!
//! Every statement filters on `owner_id`; mutations report whether a row
//! matched by checking the affected-row count.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{Description, OwnerId, Todo, TodoId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTodoRow, TodoRow};
use super::pool::{DbPool, PoolError};
use super::schema::todos;

/// Diesel-backed implementation of the `TodoRepository` port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TodoPersistenceError {
    map_basic_pool_error(error, TodoPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TodoPersistenceError {
    map_basic_diesel_error(
        error,
        TodoPersistenceError::query,
        TodoPersistenceError::connection,
    )
}

/// Convert a database row into a domain todo.
///
/// The CHECK constraint only rejects empty text, so a whitespace-only row can
/// still fail domain validation; it surfaces as a query error.
fn row_to_todo(row: TodoRow) -> Result<Todo, TodoPersistenceError> {
    let description = Description::new(row.description).map_err(|err| {
        TodoPersistenceError::query(format!("stored todo {} is invalid: {err}", row.id))
    })?;
    Ok(Todo {
        id: TodoId::new(row.id),
        description,
        completed: row.completed,
    })
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TodoRow> = todos::table
            .filter(todos::owner_id.eq(owner.as_str()))
            .order(todos::id.asc())
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn insert(
        &self,
        owner: &OwnerId,
        description: &Description,
    ) -> Result<Todo, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTodoRow {
            owner_id: owner.as_str(),
            description: description.as_ref(),
            completed: false,
        };

        let row: TodoRow = diesel::insert_into(todos::table)
            .values(&new_row)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_todo(row)
    }

    async fn toggle_completed(
        &self,
        owner: &OwnerId,
        id: TodoId,
    ) -> Result<bool, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            todos::table
                .filter(todos::id.eq(id.get()))
                .filter(todos::owner_id.eq(owner.as_str())),
        )
        .set(todos::completed.eq(diesel::dsl::not(todos::completed)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }

    async fn delete(&self, owner: &OwnerId, id: TodoId) -> Result<bool, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            todos::table
                .filter(todos::id.eq(id.get()))
                .filter(todos::owner_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted == 1)
    }
}
