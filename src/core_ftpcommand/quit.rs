use crate::core_error::SessionError;
use crate::session::Session;
use log::info;

/// Handles the QUIT FTP command.
///
/// This function sends a farewell and closes the control connection. The
/// connection loop stops reading afterwards.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_quit_command(session: &mut Session) -> Result<(), SessionError> {
    info!("[{}] Received QUIT command. Closing connection.", session.id);
    session.reply(221, "Bye!").await?;
    session.close().await
}
