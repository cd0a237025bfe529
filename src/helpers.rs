use crate::config::Config;
use log::{debug, info};

// Helper function to log configuration options. Passwords are never logged.
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}", config.server.listen_address);
    info!("  Root Directory: {}", config.server.root_dir.display());
    info!("  Data Timeout: {}s", config.server.data_timeout_secs);
    info!("  Greeting: {}", config.server.greeting);
    info!("  Users: {}", config.users.len());

    let mut names: Vec<&String> = config.users.keys().collect();
    names.sort();
    for name in names {
        debug!("    {}", name);
    }
}
