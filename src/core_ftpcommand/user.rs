use crate::core_error::SessionError;
use crate::session::Session;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// A known username is stored and the password is requested. Any earlier
/// login is dropped. An unknown username leaves the session untouched.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `username` - The username provided by the client.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_user_command(
    session: &mut Session,
    username: String,
) -> Result<(), SessionError> {
    if username.is_empty() {
        return Err(SessionError::MissingArgument("USER"));
    }

    if !session.config.user_exists(&username) {
        warn!("[{}] Unknown username: {}", session.id, username);
        return session.reply(530, "User denied.").await;
    }

    info!("[{}] Username accepted: {}", session.id, username);
    session.username = username;
    session.is_authenticated = false;

    session.reply(331, "Password is required.").await
}
