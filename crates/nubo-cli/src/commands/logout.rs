//! End the server-side session and remove the saved one.

use clap::Args;

use nubo_client::RemoteBackend;
use nubo_core::result::AppResult;

use super::Connection;
use crate::credentials;
use crate::output;

/// Arguments for `logout`
#[derive(Debug, Args)]
pub struct LogoutArgs {}

/// Execute `logout`
pub async fn execute(_args: &LogoutArgs, conn: &Connection) -> AppResult<()> {
    let Some(stored) = credentials::load(&conn.session_file)? else {
        output::print_warning("Not logged in.");
        return Ok(());
    };

    // Best effort server-side: an unreachable server or an already-expired
    // token must not keep the local session file around.
    let server = conn.server_url(Some(&stored));
    match RemoteBackend::with_token(&server, &stored.token) {
        Ok(mut backend) => {
            if let Err(e) = backend.logout().await {
                output::print_warning(&format!("Server logout failed: {}", e.message));
            }
        }
        Err(e) => output::print_warning(&format!("Server logout failed: {}", e.message)),
    }

    credentials::clear(&conn.session_file)?;
    output::print_success(&format!("Logged out {}", stored.email));
    Ok(())
}
