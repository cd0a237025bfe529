use crate::config::Config;
use crate::constants::MAX_COMMAND_LINE_LENGTH;
use crate::core_error::SessionError;
use crate::core_ftpcommand::ftpcommand::{parse_command_line, FtpCommand};
use crate::core_ftpcommand::handlers::dispatch;
use crate::session::{ControlWriter, Session};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Accepts control connections forever, one task per connection.
pub async fn start_server(config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(&config.server.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_address))?;
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("An error occurred while accepting a connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config).await {
                error!("Connection error for {}: {}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

pub async fn handle_connection(socket: TcpStream, config: Arc<Config>) -> Result<(), SessionError> {
    let local_addr = socket.local_addr().map_err(SessionError::Control)?;
    let (reader, writer) = socket.into_split();
    serve_session(reader, Box::new(writer), local_addr, config).await
}

/// Runs the command loop of one session until the client quits or the control
/// connection fails.
///
/// Handler errors are logged and mapped to a reply; only control connection
/// errors end the loop.
pub async fn serve_session<R>(
    reader: R,
    writer: ControlWriter,
    local_addr: SocketAddr,
    config: Arc<Config>,
) -> Result<(), SessionError>
where
    R: AsyncRead + Unpin,
{
    let mut session = Session::new(writer, local_addr, Arc::clone(&config));
    info!("[{}] Session started", session.id);

    session.reply(220, &config.server.greeting).await?;

    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let n = (&mut reader)
            .take(MAX_COMMAND_LINE_LENGTH as u64)
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(SessionError::Control)?;
        if n == 0 {
            info!("[{}] Client disconnected", session.id);
            break;
        }
        if n == MAX_COMMAND_LINE_LENGTH && !buffer.ends_with(b"\n") {
            warn!(
                "[{}] Command line longer than {} bytes, closing session",
                session.id, MAX_COMMAND_LINE_LENGTH
            );
            session.reply(500, "Command line too long.").await?;
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        let Some((cmd, arg)) = parse_command_line(&line) else {
            continue;
        };

        let Some(command) = FtpCommand::from_str(&cmd) else {
            debug!("[{}] Ignoring unrecognized command: {}", session.id, cmd);
            continue;
        };

        if command == FtpCommand::PASS {
            debug!("[{}] Received command: PASS ****", session.id);
        } else {
            debug!("[{}] Received command: {} {}", session.id, cmd, arg);
        }

        if let Err(e) = dispatch(&mut session, command, arg).await {
            if e.is_fatal() {
                return Err(e);
            }
            warn!("[{}] Error handling command {}: {}", session.id, cmd, e);
            if let Some((code, message)) = e.to_ftp_response() {
                session.reply(code, message).await?;
            }
        }

        if session.is_closed() {
            info!("[{}] Session ended by QUIT", session.id);
            break;
        }
    }

    Ok(())
}
