//! # nubo-client
//!
//! The drive client: everything above the wire and below the UI.
//!
//! [`DriveBackend`] is the seam. [`RemoteBackend`] implements it over the
//! Nubo REST API; [`MemoryBackend`] fakes it for tests. [`DriveSession`]
//! runs the drive flows (navigation, upload, rename, trash, undo, purge)
//! against whichever backend it is given.

pub mod backend;
pub mod memory;
pub mod remote;
pub mod session;

pub use backend::{DriveBackend, NewFileRow, Principal, SignedDownload};
pub use memory::{BackendOp, MemoryBackend};
pub use remote::{AuthSession, RemoteBackend};
pub use session::{Crumb, DriveSession, PendingUndo, TrashView, UNDO_WINDOW};
