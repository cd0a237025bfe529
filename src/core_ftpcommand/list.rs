use crate::core_error::SessionError;
use crate::core_fs::ResolvedPath;
use crate::core_ftpcommand::utils::format_list_line;
use crate::session::Session;
use log::{debug, info};
use tokio::io::AsyncWriteExt;

/// Handles LIST, NLST, MLST and MLSD. All four send the same long format.
///
/// The data connection is opened and 150 sent before the target is resolved;
/// a failure after that point is mapped to a reply by the caller and the data
/// connection is dropped without a 226.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `arg` - Optional path to list, possibly preceded by `ls` style flags.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_list_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    let mut data_stream = session.open_data_connection().await?;
    session.reply(150, "Here comes the directory listing.").await?;

    let target = session.resolve(list_target(&arg).unwrap_or("."))?;
    let listing = build_listing(&target).await?;
    debug!("[{}] Listing {} ({} bytes)", session.id, target.virtual_path, listing.len());

    data_stream
        .write_all(listing.as_bytes())
        .await
        .map_err(SessionError::Transfer)?;
    data_stream
        .shutdown()
        .await
        .map_err(SessionError::Transfer)?;
    drop(data_stream);

    info!("[{}] Directory listing sent for {}", session.id, target.virtual_path);
    session.reply(226, "Directory send OK.").await
}

/// Strips leading `-flags` tokens (`LIST -la`) and returns the path, if any.
pub fn list_target(arg: &str) -> Option<&str> {
    let mut rest = arg.trim();
    while rest.starts_with('-') {
        rest = rest
            .split_once(char::is_whitespace)
            .map(|(_, path)| path.trim_start())
            .unwrap_or("");
    }

    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Builds the listing of a directory's immediate entries, sorted by name. A
/// regular file lists as itself.
async fn build_listing(target: &ResolvedPath) -> Result<String, SessionError> {
    let to_error = |e: std::io::Error| SessionError::from_fs(e, &target.virtual_path);

    let metadata = tokio::fs::metadata(&target.real_path).await.map_err(to_error)?;
    if !metadata.is_dir() {
        let name = target.virtual_path.rsplit('/').next().unwrap_or_default();
        return Ok(format_list_line(&metadata, name));
    }

    let mut entries = tokio::fs::read_dir(&target.real_path).await.map_err(to_error)?;
    let mut lines = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(to_error)? {
        let metadata = entry.metadata().await.map_err(to_error)?;
        let name = entry.file_name().to_string_lossy().to_string();
        lines.push((name.clone(), format_list_line(&metadata, &name)));
    }
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(lines.into_iter().map(|(_, line)| line).collect())
}
