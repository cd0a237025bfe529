use crate::constants::TRANSFER_BUFFER_SIZE;
use crate::core_error::SessionError;
use crate::session::Session;
use log::{info, warn};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufReader};

/// Handles the RETR (Retrieve) FTP command.
///
/// This function sends a file from the sandbox to the client over the data
/// connection, starting at the restart offset set by a previous REST. The
/// offset is consumed by this command whatever its outcome.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `arg` - The path of the file to retrieve.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_retr_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("RETR"));
    }

    let offset = session.take_restart_offset();
    let target = session.resolve(&arg)?;

    let mut file = File::open(&target.real_path)
        .await
        .map_err(|e| SessionError::from_fs(e, &target.virtual_path))?;
    let metadata = file.metadata().await.map_err(SessionError::Filesystem)?;
    if !metadata.is_file() {
        return Err(SessionError::NotAFile(target.virtual_path));
    }

    if offset > 0 {
        if offset >= metadata.len() {
            warn!(
                "[{}] Restart offset {} is past the end of {} ({} bytes)",
                session.id,
                offset,
                target.virtual_path,
                metadata.len()
            );
            return session.reply(550, "Invalid restart position.").await;
        }
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(SessionError::Filesystem)?;
    }

    let mut data_stream = session.open_data_connection().await?;
    session
        .reply(
            150,
            &format!("Opening data connection for {}.", target.virtual_path),
        )
        .await?;
    info!(
        "[{}] User {} is retrieving {} from offset {}",
        session.id, session.username, target.virtual_path, offset
    );

    let mut reader = BufReader::with_capacity(TRANSFER_BUFFER_SIZE, file);
    let sent = tokio::io::copy_buf(&mut reader, &mut data_stream)
        .await
        .map_err(SessionError::Transfer)?;
    data_stream
        .shutdown()
        .await
        .map_err(SessionError::Transfer)?;
    drop(data_stream);

    info!(
        "[{}] File transfer completed successfully: {} ({} bytes)",
        session.id, target.virtual_path, sent
    );
    session.reply(226, "Transfer complete.").await
}
