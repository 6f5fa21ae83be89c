//! # nubo-core
//!
//! Core crate for Nubo. Contains the unified error system, configuration
//! schemas, shared domain types, and the blob storage trait.
//!
//! This crate has **no** internal dependencies on other Nubo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
