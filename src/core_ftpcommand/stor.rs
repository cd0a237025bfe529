use crate::constants::TRANSFER_BUFFER_SIZE;
use crate::core_error::SessionError;
use crate::core_fs::ResolvedPath;
use crate::session::Session;
use log::{info, warn};
use std::io::{self, SeekFrom};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufReader};

/// Handles the STOR (Store File) FTP command.
///
/// This function stores a file uploaded by the client inside the sandbox.
/// With a restart offset the existing file is kept up to that offset and the
/// upload continues from there; otherwise the file is created or truncated.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `arg` - The path of the file to be stored.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_stor_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("STOR"));
    }

    let offset = session.take_restart_offset();
    let target = session.resolve(&arg)?;

    let existing_len = match tokio::fs::metadata(&target.real_path).await {
        Ok(metadata) if metadata.is_dir() => {
            return Err(SessionError::NotAFile(target.virtual_path));
        }
        Ok(metadata) => Some(metadata.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(SessionError::from_fs(e, &target.virtual_path)),
    };

    if offset > 0 && !existing_len.is_some_and(|len| offset <= len) {
        warn!(
            "[{}] Restart offset {} is invalid for upload to {}",
            session.id, offset, target.virtual_path
        );
        return session.reply(550, "Invalid restart position.").await;
    }

    // The target is left alone until a peer is actually connected.
    let mut data_stream = session.open_data_connection().await?;
    let mut file = open_target(&target, offset).await?;
    session.reply(150, "Ok to send data.").await?;
    info!(
        "[{}] User {} is storing {} from offset {}",
        session.id, session.username, target.virtual_path, offset
    );

    let mut reader = BufReader::with_capacity(TRANSFER_BUFFER_SIZE, &mut data_stream);
    let received = tokio::io::copy_buf(&mut reader, &mut file)
        .await
        .map_err(SessionError::Transfer)?;
    file.flush().await.map_err(SessionError::Filesystem)?;

    info!(
        "[{}] File stored successfully: {} ({} bytes)",
        session.id, target.virtual_path, received
    );
    session.reply(226, "Transfer complete.").await
}

/// Opens the upload target for writing at `offset`, discarding what follows.
/// An offset of zero truncates or creates the file.
async fn open_target(target: &ResolvedPath, offset: u64) -> Result<File, SessionError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    options.custom_flags(libc::O_NOFOLLOW);

    let mut file = options
        .open(&target.real_path)
        .await
        .map_err(|e| SessionError::from_fs(e, &target.virtual_path))?;
    file.set_len(offset).await.map_err(SessionError::Filesystem)?;
    if offset > 0 {
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(SessionError::Filesystem)?;
    }
    Ok(file)
}
