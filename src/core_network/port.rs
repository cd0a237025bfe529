use crate::core_error::SessionError;
use crate::core_network::deadline::within;
use crate::core_network::transfer_mode::TransferMode;
use crate::session::Session;
use log::{debug, info, warn};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;

/// Parses a PORT argument `h1,h2,h3,h4,p1,p2` into the target address.
///
/// On failure, returns the text of the 501 reply.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddr, &'static str> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != 6 {
        return Err("Syntax error in arguments.");
    }

    let ip_parts = parts[0..4]
        .iter()
        .map(|x| x.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| "Invalid IP address.")?;

    let port_parts = parts[4..6]
        .iter()
        .map(|x| x.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| "Invalid port.")?;

    let ip = Ipv4Addr::new(ip_parts[0], ip_parts[1], ip_parts[2], ip_parts[3]);
    let port = u16::from(port_parts[0]) << 8 | u16::from(port_parts[1]);
    if port == 0 {
        return Err("Invalid port.");
    }

    Ok(SocketAddr::from((ip, port)))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the target; the connection is dialed by the next transfer
/// command. A pending passive listener is closed.
pub async fn handle_port_command(session: &mut Session, arg: String) -> Result<(), SessionError> {
    if !session.ensure_authenticated().await? {
        return Ok(());
    }

    let addr = match parse_port_argument(&arg) {
        Ok(addr) => addr,
        Err(reason) => {
            warn!("[{}] Malformed PORT argument: {:?}", session.id, arg);
            return session.reply(501, reason).await;
        }
    };

    session.set_transfer_mode(TransferMode::Active(addr));
    info!("[{}] Received PORT command with target {}", session.id, addr);

    session.reply(200, "PORT command success.").await
}

/// Dials the client for an active mode transfer.
pub async fn connect_active(addr: SocketAddr, limit: Duration) -> Result<TcpStream, SessionError> {
    let data_stream = within(limit, "dialing the client", TcpStream::connect(addr)).await?;
    debug!("Connection established with {}", addr);
    Ok(data_stream)
}
