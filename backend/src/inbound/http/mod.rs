//! HTTP inbound adapter serving the todo page, agent envelopes, and scripts.

pub mod assets;
pub mod error;
pub mod failure_policy;
pub mod identity;
pub mod render;
pub mod render_mode;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;

pub use error::ApiResult;
