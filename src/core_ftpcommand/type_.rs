use crate::core_error::SessionError;
use crate::session::Session;
use log::debug;

/// Handles the TYPE FTP command.
///
/// Every transfer is binary; the requested type is acknowledged and not
/// enforced.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `arg` - The argument specifying the transfer type.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_type_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    debug!("[{}] TYPE {} acknowledged", session.id, arg);

    let primary_type = arg.split_whitespace().next().map(|s| s.to_uppercase());
    match primary_type {
        Some(t) => session.reply(200, &format!("Type set to {}.", t)).await,
        None => session.reply(200, "OK.").await,
    }
}
