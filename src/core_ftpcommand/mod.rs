// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod feat;
pub mod list;
pub mod mdtm;
pub mod noop;
pub mod opts;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rest;
pub mod retr;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Parsing and dispatch
pub mod ftpcommand;
pub mod handlers;

// The utils and common functions are here
pub mod utils;

#[cfg(test)]
mod test_commands;
