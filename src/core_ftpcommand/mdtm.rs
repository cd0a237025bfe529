use crate::core_error::SessionError;
use crate::core_ftpcommand::utils::modification_time;
use crate::session::Session;
use log::info;

/// Handles the MDTM (Modification Time) FTP command: `213 YYYYMMDDHHMMSS`, UTC.
pub async fn handle_mdtm_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("MDTM"));
    }

    let target = session.resolve(&arg)?;
    let metadata = tokio::fs::metadata(&target.real_path)
        .await
        .map_err(|e| SessionError::from_fs(e, &target.virtual_path))?;

    if !metadata.is_file() {
        return Err(SessionError::NotAFile(target.virtual_path));
    }

    let modified = modification_time(&metadata).format("%Y%m%d%H%M%S").to_string();
    info!("[{}] Modification time for {} is {}", session.id, target.virtual_path, modified);
    session.reply(213, &modified).await
}
