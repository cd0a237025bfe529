use crate::core_error::SessionError;
use crate::core_fs::ResolvedPath;
use crate::session::Session;
use log::info;

pub async fn handle_cwd_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    if arg.is_empty() {
        return Err(SessionError::MissingArgument("CWD"));
    }

    let target = session.resolve(&arg)?;
    change_directory(session, target).await
}

/// Moves the session into `target` if it is an existing directory.
pub async fn change_directory(
    session: &mut Session,
    target: ResolvedPath,
) -> Result<(), SessionError> {
    let metadata = tokio::fs::metadata(&target.real_path)
        .await
        .map_err(|e| SessionError::from_fs(e, &target.virtual_path))?;
    if !metadata.is_dir() {
        return Err(SessionError::NotADirectory(target.virtual_path));
    }

    // The session keeps the virtual path, never the real one.
    session.current_dir = target.virtual_path;
    info!(
        "[{}] Directory successfully changed to: {}",
        session.id, session.current_dir
    );
    session.reply(250, "Directory successfully changed.").await
}
