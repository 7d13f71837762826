//! Endpoints of the API under test

use std::fmt;

use reqwest::Method;

/// One endpoint of the CRUD API
///
/// The [`name`](Endpoint::name) is the stable label used for metrics and
/// logs; it keeps `{id}` as a placeholder so all fetch-by-id calls aggregate
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    ListRoles,
    ListUsers,
    CreateUser,
    GetUser,
    CreateRole,
    GetRole,
}

impl Endpoint {
    /// HTTP method
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login | Endpoint::CreateUser | Endpoint::CreateRole => Method::POST,
            Endpoint::ListRoles | Endpoint::ListUsers | Endpoint::GetUser | Endpoint::GetRole => {
                Method::GET
            }
        }
    }

    /// Path template relative to the base URL
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::Login => "/auth/login",
            Endpoint::ListRoles | Endpoint::CreateRole => "/roles",
            Endpoint::ListUsers | Endpoint::CreateUser => "/users",
            Endpoint::GetUser => "/users/{id}",
            Endpoint::GetRole => "/roles/{id}",
        }
    }

    /// Metric label, e.g. `GET /users/{id}`
    pub const fn name(&self) -> &'static str {
        match self {
            Endpoint::Login => "POST /auth/login",
            Endpoint::ListRoles => "GET /roles",
            Endpoint::ListUsers => "GET /users",
            Endpoint::CreateUser => "POST /users",
            Endpoint::GetUser => "GET /users/{id}",
            Endpoint::CreateRole => "POST /roles",
            Endpoint::GetRole => "GET /roles/{id}",
        }
    }

    /// Whether the request carries the bearer token
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Endpoint::Login)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
