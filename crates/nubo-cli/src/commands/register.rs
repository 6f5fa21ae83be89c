//! Create an account and start a session.

use clap::Args;

use nubo_core::error::AppError;
use nubo_core::result::AppResult;

use super::Connection;
use crate::credentials::{self, StoredSession};
use crate::output;

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Email address (prompts when omitted)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Display name shown instead of the email
    #[arg(short, long)]
    pub display_name: Option<String>,

    /// Password (prompts when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute `register`
pub async fn execute(args: &RegisterArgs, conn: &Connection) -> AppResult<()> {
    let (mut backend, server) = super::anonymous_backend(conn)?;

    let email = match &args.email {
        Some(email) => email.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let session = backend
        .register(&email, &password, args.display_name.as_deref())
        .await?;

    credentials::save(
        &conn.session_file,
        &StoredSession {
            server,
            email: session.principal.email.clone(),
            token: session.token.clone(),
            expires_at: session.expires_at,
        },
    )?;

    output::print_success(&format!(
        "Account created; logged in as {}",
        session.principal.label()
    ));
    Ok(())
}
