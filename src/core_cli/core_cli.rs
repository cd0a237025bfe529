use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "dockftpd", about = "A sandboxed FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the bcrypt hash of a password for the [users] table, then exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}

impl Cli {
    /// The configuration path, falling back to the system default.
    pub fn config_path<'a>(&'a self, default: &'a str) -> &'a str {
        if self.config.is_empty() {
            default
        } else {
            self.config.as_str()
        }
    }
}
