//! Generated request bodies
//!
//! Usernames and role names combine a random lowercase suffix with the
//! current Unix time in milliseconds, so they do not repeat within a run.

use chrono::Utc;
use crudload_client::{NewRole, NewUser, ResourceId};
use rand::Rng;

/// Password for every created user
pub const USER_PASSWORD: &str = "password123";

/// Description for every created role
pub const ROLE_DESCRIPTION: &str = "Performance test role";

const USERNAME_SUFFIX_LEN: usize = 5;
const ROLE_SUFFIX_LEN: usize = 4;

/// `len` random characters from `a..=z`
pub fn random_lowercase<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| rng.random_range('a'..='z')).collect()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// `user_<5 letters>_<millis>@test.com`
pub fn username<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "user_{}_{}@test.com",
        random_lowercase(rng, USERNAME_SUFFIX_LEN),
        now_millis()
    )
}

/// `role_<4 letters>_<millis>`
pub fn role_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("role_{}_{}", random_lowercase(rng, ROLE_SUFFIX_LEN), now_millis())
}

/// Body for `POST /users`
pub fn new_user<R: Rng + ?Sized>(rng: &mut R, role_id: ResourceId) -> NewUser {
    NewUser {
        username: username(rng),
        password: USER_PASSWORD.to_string(),
        role_id,
    }
}

/// Body for `POST /roles`
pub fn new_role<R: Rng + ?Sized>(rng: &mut R) -> NewRole {
    NewRole {
        name: role_name(rng),
        description: ROLE_DESCRIPTION.to_string(),
    }
}
