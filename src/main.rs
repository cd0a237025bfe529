mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_error;
mod core_fs;
mod core_ftpcommand;
mod core_network;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_auth::helper::hash_password;
use crate::core_cli::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    if let Some(password) = args.hash_password.as_deref() {
        let hashed = hash_password(password).context("Failed to hash password")?;
        println!("{}", hashed);
        return Ok(());
    }

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => record.level().to_string().red(),
                Level::Warn => record.level().to_string().yellow(),
                Level::Info => record.level().to_string().green(),
                Level::Debug | Level::Trace => record.level().to_string().blue(),
            };
            writeln!(buf, "[{}] [{}] {}", buf.timestamp(), level, record.args())
        })
        .init();

    // Load configuration from the TOML file
    let config_path = args.config_path(DEFAULT_CONFIG_PATH);
    let config = Config::load_from_file(Path::new(config_path))
        .with_context(|| format!("Failed to load configuration file: {}", config_path))?;

    // Run the FTP server
    server::run(config).await
}
