use crate::core_error::SessionError;
use crate::session::Session;

pub async fn handle_noop_command(session: &mut Session) -> Result<(), SessionError> {
    session.reply(200, "OK.").await
}
