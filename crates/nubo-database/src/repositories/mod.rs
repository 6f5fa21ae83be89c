//! Repository implementations, one per entity.

pub mod file;
pub mod folder;
pub mod session;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
