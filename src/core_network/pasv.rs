use crate::core_error::SessionError;
use crate::core_network::deadline::within;
use crate::core_network::transfer_mode::TransferMode;
use crate::session::Session;
use log::{debug, info};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Handles the PASV (Passive Mode) FTP command.
///
/// Binds an ephemeral listener, records it as the pending transfer mode and
/// advertises its address. Any pending PORT target or older passive listener
/// is discarded first.
///
/// # Arguments
///
/// * `session` - The session of the client issuing the command.
/// * `_arg` - Unused.
///
/// # Returns
///
/// Result<(), SessionError> indicating the success or failure of the operation.
pub async fn handle_pasv_command(session: &mut Session, _arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    session.set_transfer_mode(TransferMode::None);

    let listener = setup_pasv_listener()
        .await
        .map_err(SessionError::DataConnection)?;
    let port = listener
        .local_addr()
        .map_err(SessionError::DataConnection)?
        .port();
    let ip = advertised_ip(session.local_addr);

    session.set_transfer_mode(TransferMode::Passive(listener));
    info!("[{}] PASV listener set up on port {}", session.id, port);

    session.reply(227, &format_pasv_reply(ip, port)).await
}

/// Sets up a passive mode (PASV) listener on an ephemeral port.
pub async fn setup_pasv_listener() -> std::io::Result<TcpListener> {
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await
}

/// Picks the address advertised in the PASV reply: the local address of the
/// control connection when it is a concrete IPv4 address, loopback otherwise.
pub fn advertised_ip(control_local_addr: SocketAddr) -> Ipv4Addr {
    let ip = match control_local_addr.ip() {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    };

    match ip {
        Some(v4) if !v4.is_unspecified() => v4,
        _ => Ipv4Addr::LOCALHOST,
    }
}

pub fn format_pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{})",
        h1,
        h2,
        h3,
        h4,
        port / 256,
        port % 256
    )
}

/// Accepts the incoming connection on the passive listener.
///
/// The listener is dropped on return, whether a peer connected or not.
pub async fn accept_passive(
    listener: TcpListener,
    limit: Duration,
) -> Result<TcpStream, SessionError> {
    let (data_stream, addr) =
        within(limit, "accepting a passive connection", listener.accept()).await?;
    debug!("Accepted data connection from: {}", addr);
    Ok(data_stream)
}
