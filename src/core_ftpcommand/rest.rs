use crate::core_error::SessionError;
use crate::session::Session;
use log::info;

/// Handles the REST (Restart) FTP command.
///
/// Stores the byte offset the next RETR or STOR starts from.
pub async fn handle_rest_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("REST"));
    }

    let offset: u64 = arg.parse().map_err(|_| {
        SessionError::InvalidArgument(format!("REST offset {:?} is not a number", arg))
    })?;

    session.restart_offset = offset;
    info!("[{}] Restart offset set to {}", session.id, offset);
    session
        .reply(350, &format!("Restarting at {}. Send RETR or STOR.", offset))
        .await
}
