//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::todos;

/// Row struct for reading from the todos table.
///
/// The owner column is only ever used as a filter, so it is not selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct TodoRow {
    pub id: i64,
    pub description: String,
    pub completed: bool,
}

/// Insertable struct for creating new todo records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub owner_id: &'a str,
    pub description: &'a str,
    pub completed: bool,
}
