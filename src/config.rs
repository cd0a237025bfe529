use crate::constants::{
    DATA_CONNECTION_TIMEOUT_SECS, DEFAULT_GREETING, DEFAULT_LISTEN_ADDRESS, USERNAME_REGEX,
};
use crate::core_auth::core_auth;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad configuration format: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("root directory {0:?} does not exist or is not a directory")]
    InvalidRoot(PathBuf),

    #[error("invalid username {0:?}")]
    InvalidUsername(String),

    #[error("data_timeout_secs must be greater than zero")]
    InvalidTimeout,

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    pub root_dir: PathBuf,
    #[serde(default = "default_data_timeout_secs")]
    pub data_timeout_secs: u64,
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    /// username -> password, plaintext or bcrypt hash
    #[serde(default)]
    pub users: HashMap<String, String>,
}

fn default_listen_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

fn default_data_timeout_secs() -> u64 {
    DATA_CONNECTION_TIMEOUT_SECS
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.root_dir.is_dir() {
            return Err(ConfigError::InvalidRoot(self.server.root_dir.clone()));
        }

        if self.server.data_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let username_regex = Regex::new(USERNAME_REGEX)?;
        if let Some(bad) = self.users.keys().find(|u| !username_regex.is_match(u)) {
            return Err(ConfigError::InvalidUsername(bad.clone()));
        }

        if self.users.is_empty() {
            warn!("No users configured, nobody will be able to log in.");
        }

        Ok(())
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.server.data_timeout_secs)
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn check_password(&self, username: &str, password: &str) -> bool {
        core_auth::authenticate(&self.users, username, password).is_ok()
    }
}
