// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.-]{1,32}$";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/dockftpd.toml";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:21";
pub const DEFAULT_GREETING: &str = "dockftpd is welcoming you!";

/// Upper bound for dialing an active peer or waiting for a passive one.
pub const DATA_CONNECTION_TIMEOUT_SECS: u64 = 10;

pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

/// Longest control line accepted, terminator included.
pub const MAX_COMMAND_LINE_LENGTH: usize = 4096;

pub const SERVER_FEATURES: [&str; 6] = ["UTF8", "PASV", "PORT", "SIZE", "MDTM", "REST STREAM"];

// Pseudo values for listings, clients do not care about them.
pub const LIST_LINK_COUNT: &str = "1";
pub const LIST_OWNER: &str = "root";
pub const LIST_GROUP: &str = "group";
