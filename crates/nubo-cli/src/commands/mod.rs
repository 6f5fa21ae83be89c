//! CLI command definitions and dispatch.

pub mod download;
pub mod login;
pub mod logout;
pub mod ls;
pub mod mkdir;
pub mod open;
pub mod register;
pub mod rename;
pub mod rm;
pub mod trash;
pub mod upload;
pub mod usage;
pub mod whoami;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use nubo_client::{DriveSession, RemoteBackend};
use nubo_core::error::AppError;
use nubo_core::result::AppResult;

use crate::credentials::{self, StoredSession};
use crate::output::OutputFormat;

/// Fallback server when neither `--server` nor a saved session names one.
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// Nubo — personal cloud drive
#[derive(Debug, Parser)]
#[command(name = "nubo", version, about, long_about = None)]
pub struct Cli {
    /// Server URL (overrides NUBO_SERVER and the saved session's server)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Path to the session file
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register(register::RegisterArgs),
    /// Log in and save the session
    Login(login::LoginArgs),
    /// Log out and remove the saved session
    Logout(logout::LogoutArgs),
    /// Show who is logged in
    Whoami(whoami::WhoamiArgs),
    /// List a folder
    Ls(ls::LsArgs),
    /// Create a folder
    Mkdir(mkdir::MkdirArgs),
    /// Upload a local file
    Upload(upload::UploadArgs),
    /// Download a file
    Download(download::DownloadArgs),
    /// Print a share link for a file
    Open(open::OpenArgs),
    /// Rename a file or folder
    Rename(rename::RenameArgs),
    /// Move a file or folder to the trash
    Rm(rm::RmArgs),
    /// Trash management
    Trash(trash::TrashArgs),
    /// Show storage usage
    Usage(usage::UsageArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let conn = Connection {
            server: self
                .server
                .clone()
                .or_else(|| std::env::var("NUBO_SERVER").ok()),
            session_file: self
                .session_file
                .clone()
                .unwrap_or_else(credentials::default_path),
        };

        match &self.command {
            Commands::Register(args) => register::execute(args, &conn).await,
            Commands::Login(args) => login::execute(args, &conn).await,
            Commands::Logout(args) => logout::execute(args, &conn).await,
            Commands::Whoami(args) => whoami::execute(args, &conn, self.format).await,
            Commands::Ls(args) => ls::execute(args, &conn, self.format).await,
            Commands::Mkdir(args) => mkdir::execute(args, &conn).await,
            Commands::Upload(args) => upload::execute(args, &conn).await,
            Commands::Download(args) => download::execute(args, &conn).await,
            Commands::Open(args) => open::execute(args, &conn).await,
            Commands::Rename(args) => rename::execute(args, &conn).await,
            Commands::Rm(args) => rm::execute(args, &conn).await,
            Commands::Trash(args) => trash::execute(args, &conn, self.format).await,
            Commands::Usage(args) => usage::execute(args, &conn, self.format).await,
        }
    }
}

/// Connection settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Explicit server override, if any.
    pub server: Option<String>,
    /// Where the saved session lives.
    pub session_file: PathBuf,
}

impl Connection {
    /// The server to talk to: the override first, then the saved
    /// session's server, then the default.
    pub fn server_url(&self, stored: Option<&StoredSession>) -> String {
        self.server
            .clone()
            .or_else(|| stored.map(|s| s.server.clone()))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }
}

/// Helper: backend without credentials, for register and login.
pub fn anonymous_backend(conn: &Connection) -> AppResult<(RemoteBackend, String)> {
    let stored = credentials::load(&conn.session_file)?;
    let server = conn.server_url(stored.as_ref());
    Ok((RemoteBackend::new(&server)?, server))
}

/// Helper: connect a drive session from the saved login.
pub async fn drive_session(conn: &Connection) -> AppResult<DriveSession<RemoteBackend>> {
    let stored = credentials::load(&conn.session_file)?
        .ok_or_else(|| AppError::authentication("Not logged in. Run 'nubo login' first."))?;
    let server = conn.server_url(Some(&stored));
    let backend = RemoteBackend::with_token(&server, &stored.token)?;
    DriveSession::connect(backend).await
}

/// Helper: parse a UUID command-line argument.
pub fn parse_id(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::validation(format!("Invalid id '{value}': {e}")))
}
