//! # nubo-service
//!
//! Business logic service layer for Nubo. Each service orchestrates
//! repositories, the blob store, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod blob;
pub mod context;
pub mod file;
pub mod folder;
pub mod usage;

pub use auth::AuthService;
pub use blob::BlobService;
pub use context::RequestContext;
pub use file::FileService;
pub use folder::FolderService;
pub use usage::UsageService;
