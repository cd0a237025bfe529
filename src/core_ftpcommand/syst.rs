use crate::core_error::SessionError;
use crate::session::Session;

/// Handles the SYST (System) FTP command.
///
/// Clients expect a UNIX-style answer to pick their listing parser; the
/// reply says nothing about the host OS.
pub async fn handle_syst_command(session: &mut Session) -> Result<(), SessionError> {
    session.reply(215, "UNIX Type: L8").await
}
