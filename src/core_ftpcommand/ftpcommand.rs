#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    OPTS,
    FEAT,
    SYST,
    PASV,
    PORT,
    TYPE,
    LIST,
    NLST,
    MLST,
    MLSD,
    PWD,
    XPWD,
    CWD,
    XCWD,
    CDUP,
    XCUP,
    RETR,
    STOR,
    REST,
    SIZE,
    MDTM,
    NOOP,
    QUIT,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "OPTS" => Some(FtpCommand::OPTS),
            "FEAT" => Some(FtpCommand::FEAT),
            "SYST" => Some(FtpCommand::SYST),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "TYPE" => Some(FtpCommand::TYPE),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "MLST" => Some(FtpCommand::MLST),
            "MLSD" => Some(FtpCommand::MLSD),
            "PWD" => Some(FtpCommand::PWD),
            "XPWD" => Some(FtpCommand::XPWD),
            "CWD" => Some(FtpCommand::CWD),
            "XCWD" => Some(FtpCommand::XCWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "XCUP" => Some(FtpCommand::XCUP),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "REST" => Some(FtpCommand::REST),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "NOOP" => Some(FtpCommand::NOOP),
            "QUIT" => Some(FtpCommand::QUIT),
            _ => None,
        }
    }
}

/// Splits a control line into an upper-cased command and its argument.
///
/// The argument is everything after the first run of whitespace, trimmed.
/// Blank lines yield `None`.
pub fn parse_command_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim().is_empty() {
        return None;
    }

    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };
    Some((cmd.to_ascii_uppercase(), arg.to_string()))
}
