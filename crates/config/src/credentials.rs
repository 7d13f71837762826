//! Test account credentials
//!
//! Every virtual user logs in with the same account on every iteration.

use serde::Deserialize;
use std::fmt;

/// Login credentials for the test account
///
/// # Example
///
/// ```toml
/// [credentials]
/// username = "admin@email.com"
/// password = "s3cr3t"
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Account username
    /// Default: "admin@email.com"
    pub username: String,

    /// Account password
    /// Default: "s3cr3t"
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: "admin@email.com".to_string(),
            password: "s3cr3t".to_string(),
        }
    }
}

// Keep the password out of debug logs
impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
