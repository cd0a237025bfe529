// Error handling for the per-connection protocol engine
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("access denied: path escapes the sandbox root")]
    AccessDenied,

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("{0} requires an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("use PASV or PORT first")]
    NoTransferMode,

    #[error("data connection failed: {0}")]
    DataConnection(#[source] io::Error),

    #[error("data connection timeout while {0}")]
    DataConnectionTimeout(&'static str),

    #[error("transfer aborted: {0}")]
    Transfer(#[source] io::Error),

    #[error("file system error: {0}")]
    Filesystem(#[source] io::Error),

    #[error("control connection error: {0}")]
    Control(#[source] io::Error),
}

impl SessionError {
    /// Maps a filesystem error, keeping "not found" distinct so the client
    /// sees a 550 rather than a local processing error.
    pub fn from_fs(err: io::Error, path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SessionError::NotFound(path.to_string()),
            _ => SessionError::Filesystem(err),
        }
    }

    /// A fatal error ends the session: the control connection is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Control(_))
    }

    /// The reply the client receives for this error, if any.
    pub fn to_ftp_response(&self) -> Option<(u16, &'static str)> {
        match self {
            SessionError::AccessDenied => Some((550, "Access denied.")),
            SessionError::NotFound(_) => Some((550, "No such file or directory.")),
            SessionError::NotADirectory(_) => Some((550, "Not a directory.")),
            SessionError::NotAFile(_) => Some((550, "Not a regular file.")),
            SessionError::MissingArgument(_) | SessionError::InvalidArgument(_) => {
                Some((501, "Syntax error in parameters or arguments."))
            }
            SessionError::NoTransferMode => Some((425, "Use PASV or PORT first.")),
            SessionError::DataConnection(_) | SessionError::DataConnectionTimeout(_) => {
                Some((425, "Can't open data connection."))
            }
            SessionError::Transfer(_) => Some((426, "Connection closed; transfer aborted.")),
            SessionError::Filesystem(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Some((550, "Permission denied."))
            }
            SessionError::Filesystem(_) => {
                Some((451, "Requested action aborted. Local error in processing."))
            }
            SessionError::Control(_) => None,
        }
    }
}
