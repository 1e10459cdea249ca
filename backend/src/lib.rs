//! Multi-user todo server exposing every page action as a WebMCP tool.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the todo
//! model and its ports, [`outbound`] the SQLite adapter, and [`inbound`] the
//! Actix handlers that render either the HTML page or the agent envelope.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use domain::TraceId;
pub use middleware::Trace;
