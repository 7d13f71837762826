//! crudload - API client
//!
//! Typed access to the role/user CRUD API the load test drives.
//!
//! # Endpoints
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | POST | /auth/login | `{username, password}` |
//! | GET | /roles | |
//! | GET | /users | |
//! | POST | /users | `{username, password, roleId}` |
//! | GET | /users/{id} | |
//! | POST | /roles | `{name, description}` |
//! | GET | /roles/{id} | |
//!
//! Every call except login carries `Authorization: Bearer <token>`.
//!
//! # Example
//!
//! ```ignore
//! use crudload_client::{ApiClient, ClientConfig, Credentials, CrudApi, envelope};
//!
//! let api = ApiClient::new(ClientConfig::default())?;
//! let login = api.login(&Credentials::new("admin@email.com", "s3cr3t")).await?;
//! let token = login.json().and_then(envelope::access_token);
//! ```

mod client;
mod endpoint;
pub mod envelope;
mod error;
mod models;
mod response;
mod traits;

pub use client::{ApiClient, ClientConfig};
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use models::{Credentials, NewRole, NewUser, ResourceId};
pub use response::ApiResponse;
pub use traits::CrudApi;
