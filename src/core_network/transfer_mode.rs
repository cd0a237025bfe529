use crate::core_error::SessionError;
use crate::core_network::{pasv, port};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// How the next data connection is established. At most one mode is pending
/// and each is used for exactly one transfer.
#[derive(Debug, Default)]
pub enum TransferMode {
    #[default]
    None,
    /// PORT: the server dials the client.
    Active(SocketAddr),
    /// PASV: the client dials the server's ephemeral listener.
    Passive(TcpListener),
}

impl TransferMode {
    pub fn describe(&self) -> &'static str {
        match self {
            TransferMode::None => "no",
            TransferMode::Active(_) => "active",
            TransferMode::Passive(_) => "passive",
        }
    }

    /// Establishes the data connection. Consumes the mode, so a passive
    /// listener is closed whatever the outcome.
    pub async fn open(self, limit: Duration) -> Result<TcpStream, SessionError> {
        match self {
            TransferMode::None => Err(SessionError::NoTransferMode),
            TransferMode::Active(addr) => port::connect_active(addr, limit).await,
            TransferMode::Passive(listener) => pasv::accept_passive(listener, limit).await,
        }
    }
}
