//! Request bodies and identifiers exchanged with the API

use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// Identifier of a user or role as returned by the API
///
/// The API may send numeric or string ids; both are rendered verbatim into
/// `/users/{id}` and serialized back in their original JSON type. Integral
/// floats such as `7.0` are read as `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    /// Numbers outside `i64` or with a fraction
    Numeric(Number),
    Text(String),
}

/// Floats up to 2^53 hold integers exactly
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl ResourceId {
    /// Read an id from a JSON value
    ///
    /// Falsy values (`0`, `""`, `null`, `false`) and non-scalar values yield
    /// `None`: an id of zero is treated the same as a missing id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Self::from_number(n),
            Value::String(s) if !s.is_empty() => Some(ResourceId::Text(s.clone())),
            _ => None,
        }
    }

    fn from_number(n: &Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            return (i != 0).then_some(ResourceId::Number(i));
        }
        if n.is_u64() {
            return Some(ResourceId::Numeric(n.clone()));
        }

        let f = n.as_f64()?;
        if f == 0.0 {
            None
        } else if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT {
            Some(ResourceId::Number(f as i64))
        } else {
            Some(ResourceId::Numeric(n.clone()))
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Numeric(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

/// Login request body
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl From<&crudload_config::CredentialsConfig> for Credentials {
    fn from(config: &crudload_config::CredentialsConfig) -> Self {
        Self::new(&config.username, &config.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// `POST /users` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role_id: ResourceId,
}

/// `POST /roles` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
}
