use crate::core_error::SessionError;
use crate::core_fs::virtual_path::parent_virtual;
use crate::core_ftpcommand::cwd::change_directory;
use crate::session::Session;

/// Handles the CDUP FTP command. At the root the directory stays `/`.
pub async fn handle_cdup_command(session: &mut Session) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    let parent = parent_virtual(&session.current_dir);
    let target = session.resolve(&parent)?;
    change_directory(session, target).await
}
