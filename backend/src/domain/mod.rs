//! Domain primitives, ports, and services.
//!
//! Purpose: keep the todo model and its use-cases free of HTTP and SQL
//! concerns. Inbound adapters talk to [`ports::TodoQuery`] and
//! [`ports::TodoCommand`]; outbound adapters implement
//! [`ports::TodoRepository`].
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - OwnerId — the per-browser identity token and sole credential.
//! - Todo / TodoId / Description — the todo item model.
//! - TodoService — driving-port implementation over a repository.
//! - TraceId — request correlation identifier.

pub mod error;
pub mod owner;
pub mod ports;
pub mod todo;
pub mod todo_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::owner::{OwnerId, OwnerIdValidationError};
pub use self::todo::{Description, DescriptionValidationError, Todo, TodoId};
pub use self::todo_service::TodoService;
pub use self::trace_id::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
