//! # nubo-entity
//!
//! Domain entity models for Nubo. Every struct in this crate represents a
//! database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod session;
pub mod user;

pub use file::{CreateFile, File, FileUpdate};
pub use folder::{CreateFolder, Folder, FolderUpdate};
pub use session::Session;
pub use user::{CreateUser, User};
