//! # nubo-database
//!
//! SQLite database connection management and concrete repository
//! implementations for all Nubo entities.
//!
//! Every repository query is scoped by the owning user: the `user_id`
//! column is part of each WHERE clause, so one user's rows are never
//! visible to another regardless of what the caller passes in.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
