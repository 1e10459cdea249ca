//! SQLite persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```ignore
//! use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("./todos.db")).await?;
//! ensure_schema(&pool).await?;
//! let repo = DieselTodoRepository::new(pool);
//! ```

mod bootstrap;
mod diesel_basic_error_mapping;
mod diesel_todo_repository;
mod models;
mod pool;
mod schema;

pub use bootstrap::{SchemaBootstrapError, ensure_schema};
pub use diesel_todo_repository::DieselTodoRepository;
pub use pool::{DbPool, PoolConfig, PoolError, SqliteConn};
