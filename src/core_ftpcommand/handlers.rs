use crate::core_error::SessionError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, feat, list, mdtm, noop, opts, pass, pwd, quit, rest, retr, size, stor, syst, type_,
    user,
};
use crate::session::Session;

// Specific crates for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

/// Routes a parsed command to its handler.
///
/// Handlers send their own replies; a returned error is logged and mapped to
/// a reply by the caller.
pub async fn dispatch(
    session: &mut Session,
    command: FtpCommand,
    arg: String,
) -> Result<(), SessionError> {
    match command {
        FtpCommand::USER => user::handle_user_command(session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(session, arg).await,
        FtpCommand::OPTS => opts::handle_opts_command(session, arg).await,
        FtpCommand::FEAT => feat::handle_feat_command(session).await,
        FtpCommand::SYST => syst::handle_syst_command(session).await,
        FtpCommand::PASV => pasv::handle_pasv_command(session, arg).await,
        FtpCommand::PORT => port::handle_port_command(session, arg).await,
        FtpCommand::TYPE => type_::handle_type_command(session, arg).await,
        FtpCommand::LIST | FtpCommand::NLST | FtpCommand::MLST | FtpCommand::MLSD => {
            list::handle_list_command(session, arg).await
        }
        FtpCommand::PWD | FtpCommand::XPWD => pwd::handle_pwd_command(session).await,
        FtpCommand::CWD | FtpCommand::XCWD => cwd::handle_cwd_command(session, arg).await,
        FtpCommand::CDUP | FtpCommand::XCUP => cdup::handle_cdup_command(session).await,
        FtpCommand::RETR => retr::handle_retr_command(session, arg).await,
        FtpCommand::STOR => stor::handle_stor_command(session, arg).await,
        FtpCommand::REST => rest::handle_rest_command(session, arg).await,
        FtpCommand::SIZE => size::handle_size_command(session, arg).await,
        FtpCommand::MDTM => mdtm::handle_mdtm_command(session, arg).await,
        FtpCommand::NOOP => noop::handle_noop_command(session).await,
        FtpCommand::QUIT => quit::handle_quit_command(session).await,
    }
}
