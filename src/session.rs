use crate::config::Config;
use crate::core_error::SessionError;
use crate::core_fs::{resolve, ResolvedPath};
use crate::core_network::transfer_mode::TransferMode;
use log::{debug, trace};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

/// Write half of the control connection.
pub type ControlWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Per-connection protocol state. Owned by the connection's task and never
/// shared with another connection.
pub struct Session {
    pub id: String,
    pub username: String,
    pub is_authenticated: bool,
    pub current_dir: String, // virtual, always starts with '/'
    pub transfer_mode: TransferMode,
    pub restart_offset: u64,
    pub config: Arc<Config>,
    pub local_addr: SocketAddr, // local end of the control connection
    writer: ControlWriter,
    closed: bool,
}

impl Session {
    pub fn new(writer: ControlWriter, local_addr: SocketAddr, config: Arc<Config>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: String::new(),
            is_authenticated: false,
            current_dir: String::from("/"),
            transfer_mode: TransferMode::None,
            restart_offset: 0,
            config,
            local_addr,
            writer,
            closed: false,
        }
    }

    /// Sends a single-line reply on the control connection.
    pub async fn reply(&mut self, code: u16, message: &str) -> Result<(), SessionError> {
        trace!("[{}] -> {} {}", self.id, code, message);
        self.send(format!("{} {}\r\n", code, message)).await
    }

    /// Sends a multi-line reply: `code-header`, one indented line per entry,
    /// then `code footer`.
    pub async fn reply_multiline(
        &mut self,
        code: u16,
        header: &str,
        lines: &[&str],
        footer: &str,
    ) -> Result<(), SessionError> {
        let mut response = format!("{}-{}\r\n", code, header);
        for line in lines {
            response.push_str(&format!(" {}\r\n", line));
        }
        response.push_str(&format!("{} {}\r\n", code, footer));
        self.send(response).await
    }

    async fn send(&mut self, response: String) -> Result<(), SessionError> {
        self.writer
            .write_all(response.as_bytes())
            .await
            .map_err(SessionError::Control)?;
        self.writer.flush().await.map_err(SessionError::Control)
    }

    /// Replies `530 Login required.` when the client has not logged in.
    ///
    /// Returns whether the command may proceed.
    pub async fn ensure_authenticated(&mut self) -> Result<bool, SessionError> {
        if self.is_authenticated {
            return Ok(true);
        }
        debug!("[{}] Rejected command before login", self.id);
        self.reply(530, "Login required.").await?;
        Ok(false)
    }

    /// Resolves a client path against the current directory inside the sandbox.
    pub fn resolve(&self, path: &str) -> Result<ResolvedPath, SessionError> {
        resolve(&self.config.server.root_dir, &self.current_dir, path)
    }

    /// Replaces the pending transfer mode. The previous one is dropped, which
    /// closes a pending passive listener.
    pub fn set_transfer_mode(&mut self, mode: TransferMode) {
        let previous = std::mem::replace(&mut self.transfer_mode, mode);
        if !matches!(previous, TransferMode::None) {
            debug!(
                "[{}] Discarding pending {} mode for {} mode",
                self.id,
                previous.describe(),
                self.transfer_mode.describe()
            );
        }
    }

    /// Opens the data connection for one transfer, consuming the pending mode.
    pub async fn open_data_connection(&mut self) -> Result<TcpStream, SessionError> {
        let mode = std::mem::take(&mut self.transfer_mode);
        debug!("[{}] Opening {} data connection", self.id, mode.describe());
        mode.open(self.config.data_timeout()).await
    }

    pub fn take_restart_offset(&mut self) -> u64 {
        std::mem::take(&mut self.restart_offset)
    }

    /// Shuts down the write side of the control connection.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        self.writer.shutdown().await.map_err(SessionError::Control)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
