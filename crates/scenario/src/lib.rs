//! crudload - Scenario
//!
//! The iteration each virtual user repeats against the role/user CRUD API:
//! login, list roles and users, create a user with a random existing role,
//! create a role, fetch what was created, then think.
//!
//! The journey is generic over [`CrudApi`](crudload_client::CrudApi), so it
//! runs against the HTTP client in production and a scripted fake in tests.

pub mod checks;
mod journey;
pub mod payload;

pub use journey::{CrudJourney, pick_role_id};
