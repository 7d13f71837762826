//! Check names and accepted statuses
//!
//! Names are reported verbatim, so they stay stable across releases.

pub const LOGIN: &str = "login status 200";
pub const LIST_ROLES: &str = "GET /roles status 200";
pub const LIST_USERS: &str = "GET /users status 200";
pub const CREATE_USER: &str = "POST /users status 201/200";
pub const GET_USER: &str = "GET /users/{id} status 200";
pub const CREATE_ROLE: &str = "POST /roles status 201/200";
pub const GET_ROLE: &str = "GET /roles/{id} status 200";

/// Every check, in journey order
pub const ALL: [&str; 7] = [
    LOGIN,
    LIST_ROLES,
    LIST_USERS,
    CREATE_USER,
    GET_USER,
    CREATE_ROLE,
    GET_ROLE,
];

/// Accepted for reads and login
pub const OK: &[u16] = &[200];

/// Accepted for creates
pub const CREATED: &[u16] = &[201, 200];
