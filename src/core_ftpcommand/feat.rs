use crate::constants::SERVER_FEATURES;
use crate::core_error::SessionError;
use crate::session::Session;
use log::info;

/// Handles the FEAT (Feature) FTP command.
///
/// This function responds with a list of supported features.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_feat_command(session: &mut Session) -> Result<(), SessionError> {
    info!("[{}] Responding to FEAT command with supported features.", session.id);
    session
        .reply_multiline(211, "Features:", &SERVER_FEATURES, "End")
        .await
}
