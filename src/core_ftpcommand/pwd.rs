// src/core_ftpcommand/pwd.rs
use crate::core_error::SessionError;
use crate::session::Session;

pub async fn handle_pwd_command(session: &mut Session) -> Result<(), SessionError> {
    let response = format!("\"{}\" is the current directory.", session.current_dir);
    session.reply(257, &response).await
}
