// core_ftpcommand/size.rs

use crate::core_error::SessionError;
use crate::session::Session;
use log::info;

/// Handles the SIZE (File Size) FTP command.
///
/// This function retrieves the size of a file inside the sandbox and sends it
/// back to the client.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `arg` - The path of the file, absolute or relative to the current directory.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_size_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("SIZE"));
    }

    let target = session.resolve(&arg)?;
    let metadata = tokio::fs::metadata(&target.real_path)
        .await
        .map_err(|e| SessionError::from_fs(e, &target.virtual_path))?;

    if metadata.is_dir() {
        return Err(SessionError::NotAFile(target.virtual_path));
    }

    let file_size = metadata.len();
    info!("[{}] File size for {} is {}", session.id, target.virtual_path, file_size);
    session.reply(213, &file_size.to_string()).await
}
