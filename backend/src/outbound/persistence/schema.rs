//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the statements in [`super::bootstrap`]
//! exactly.

diesel::table! {
    /// Todo items, one row per item, scoped by owner token.
    todos (id) {
        /// Primary key, assigned by SQLite `AUTOINCREMENT`.
        id -> BigInt,
        /// Identity cookie value of the owning browser.
        owner_id -> Text,
        /// Item text, non-empty.
        description -> Text,
        completed -> Bool,
    }
}
