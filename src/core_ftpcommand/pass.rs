use crate::core_error::SessionError;
use crate::session::Session;
use log::{info, warn};

/// Handles the PASS FTP command. A 530 reply always leaves the session
/// logged out, even if an earlier PASS had succeeded.
pub async fn handle_pass_command(
    session: &mut Session,
    password: String,
) -> Result<(), SessionError> {
    session.is_authenticated = false;

    if session.username.is_empty() {
        return session.reply(530, "Username not provided.").await;
    }

    if !session.config.check_password(&session.username, &password) {
        warn!("[{}] Wrong password for user {}", session.id, session.username);
        return session.reply(530, "Wrong password.").await;
    }

    session.is_authenticated = true;
    info!("[{}] User {} logged in", session.id, session.username);
    session.reply(230, "Login success.").await
}
