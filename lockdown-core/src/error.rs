use thiserror::Error;

/// Errors produced at the crate's boundary.
///
/// The engine and the store are total: they never fail for well-formed
/// input. Only input validation and administrative lookups on unknown
/// usernames produce errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no account record found for user: {username}")]
    AccountNotFound { username: String },

    #[error("username is null or empty")]
    InvalidUsername,
}
