use crate::core_error::SessionError;
use crate::session::Session;
use log::debug;

/// Handles the OPTS FTP command. Only `OPTS UTF8` (optionally `ON`) is known;
/// UTF-8 is always on.
pub async fn handle_opts_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    let option = arg.split_whitespace().next().unwrap_or_default();

    if option.eq_ignore_ascii_case("UTF8") {
        session.reply(200, "UTF-8 enabled by default.").await
    } else {
        debug!("[{}] Unsupported option: {:?}", session.id, arg);
        session.reply(501, "Unknown option.").await
    }
}
