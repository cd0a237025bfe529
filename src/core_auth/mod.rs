pub mod core_auth;
pub mod helper;
