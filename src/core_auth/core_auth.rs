use crate::core_auth::helper::verify_password;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found: {0}")]
    UnknownUser(String),

    #[error("wrong password for user {0}")]
    WrongPassword(String),
}

/// Verifies a username/password pair against the configured user table.
pub fn authenticate(
    users: &HashMap<String, String>,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    let stored = users
        .get(username)
        .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;

    if verify_password(password, stored) {
        Ok(())
    } else {
        Err(AuthError::WrongPassword(username.to_string()))
    }
}
