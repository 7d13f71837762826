//! The CRUD journey
//!
//! One iteration, strictly sequential:
//!
//! ```text
//! POST /auth/login ──(no token)──► abort
//!   │
//!   ├─► GET /roles ──► pick a random role id
//!   ├─► GET /users
//!   ├─► POST /users        (only with a role id)
//!   │     └─► GET /users/{id}   (only if created with an id)
//!   ├─► POST /roles        (always)
//!   │     └─► GET /roles/{id}   (only if created with an id)
//!   └─► think time
//! ```
//!
//! Every response is checked, and a failed check never stops the iteration.
//! A missing login token is the only early exit.

use std::future::Future;
use std::time::{Duration, Instant};

use crudload_client::{ApiResponse, ClientError, Credentials, CrudApi, Endpoint, ResourceId, envelope};
use crudload_config::Config;
use crudload_loadgen::{IterationOutcome, Scenario, VirtualUser};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{checks, payload};

/// Longest body excerpt written to trace logs
const BODY_PREVIEW_LEN: usize = 200;

/// Role/user CRUD journey over any [`CrudApi`]
pub struct CrudJourney<A> {
    api: A,
    credentials: Credentials,
    think_time: Duration,
}

impl<A: CrudApi> CrudJourney<A> {
    pub fn new(api: A, credentials: Credentials, think_time: Duration) -> Self {
        Self {
            api,
            credentials,
            think_time,
        }
    }

    /// Use `[credentials]` and `load.think_time` from the configuration
    pub fn from_config(api: A, config: &Config) -> Self {
        Self::new(
            api,
            Credentials::from(&config.credentials),
            config.load.think_time,
        )
    }

    /// Replace the think time (the smoke check runs without one)
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Issue one request and record it
    ///
    /// Transport failures are recorded and logged, then surface as `None` so
    /// the caller's check fails like any unexpected status.
    async fn call(
        &self,
        vu: &VirtualUser,
        endpoint: Endpoint,
        request: impl Future<Output = Result<ApiResponse, ClientError>>,
    ) -> Option<ApiResponse> {
        let started = Instant::now();
        match request.await {
            Ok(response) => {
                vu.record_request(endpoint.name(), response.status(), started.elapsed());
                trace!(
                    vu = vu.id(),
                    endpoint = %endpoint,
                    status = response.status(),
                    body = %response.body_preview(BODY_PREVIEW_LEN),
                    "response"
                );
                Some(response)
            }
            Err(e) => {
                vu.record_transport_error(endpoint.name(), started.elapsed());
                debug!(vu = vu.id(), endpoint = %endpoint, error = %e, "request failed");
                None
            }
        }
    }
}

impl<A: CrudApi + 'static> Scenario for CrudJourney<A> {
    fn name(&self) -> &str {
        "crud-journey"
    }

    async fn iteration(&self, vu: &mut VirtualUser) -> IterationOutcome {
        // Login
        let login = self
            .call(vu, Endpoint::Login, self.api.login(&self.credentials))
            .await;
        vu.check(checks::LOGIN, status_in(&login, checks::OK));

        let Some(token) = login
            .as_ref()
            .and_then(ApiResponse::json)
            .and_then(envelope::access_token)
        else {
            debug!(vu = vu.id(), iteration = vu.iteration(), "no access token, skipping iteration");
            return IterationOutcome::Aborted;
        };

        // Roles, then pick one for the new user
        let roles = self
            .call(vu, Endpoint::ListRoles, self.api.list_roles(&token))
            .await;
        vu.check(checks::LIST_ROLES, status_in(&roles, checks::OK));
        let role_id = roles
            .as_ref()
            .and_then(ApiResponse::json)
            .and_then(|body| pick_role_id(body, vu.rng()));

        let users = self
            .call(vu, Endpoint::ListUsers, self.api.list_users(&token))
            .await;
        vu.check(checks::LIST_USERS, status_in(&users, checks::OK));

        if let Some(role_id) = role_id {
            let user = payload::new_user(vu.rng(), role_id);
            let created = self
                .call(vu, Endpoint::CreateUser, self.api.create_user(&token, &user))
                .await;

            if vu.check(checks::CREATE_USER, status_in(&created, checks::CREATED))
                && let Some(user_id) = created_id(&created)
            {
                let fetched = self
                    .call(vu, Endpoint::GetUser, self.api.get_user(&token, &user_id))
                    .await;
                vu.check(checks::GET_USER, status_in(&fetched, checks::OK));
            }
        }

        let role = payload::new_role(vu.rng());
        let created = self
            .call(vu, Endpoint::CreateRole, self.api.create_role(&token, &role))
            .await;

        if vu.check(checks::CREATE_ROLE, status_in(&created, checks::CREATED))
            && let Some(role_id) = created_id(&created)
        {
            let fetched = self
                .call(vu, Endpoint::GetRole, self.api.get_role(&token, &role_id))
                .await;
            vu.check(checks::GET_ROLE, status_in(&fetched, checks::OK));
        }

        vu.pause(self.think_time).await;
        IterationOutcome::Completed
    }
}

fn status_in(response: &Option<ApiResponse>, expected: &[u16]) -> bool {
    response.as_ref().is_some_and(|r| r.status_in(expected))
}

fn created_id(response: &Option<ApiResponse>) -> Option<ResourceId> {
    response
        .as_ref()
        .and_then(ApiResponse::json)
        .and_then(envelope::resource_id)
}

/// Uniformly random element's `id` from a roles list response
///
/// `None` for an empty list, a body that is not a list, or a chosen element
/// without a usable id.
pub fn pick_role_id<R: Rng + ?Sized>(body: &Value, rng: &mut R) -> Option<ResourceId> {
    envelope::collection(body)?
        .choose(rng)?
        .get("id")
        .and_then(ResourceId::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::tests::matches_pattern;
    use crudload_client::{NewRole, NewUser};
    use crudload_metrics::MetricsCollector;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    // =========================================================================
    // Scripted API
    // =========================================================================

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Login,
        ListRoles(String),
        ListUsers(String),
        CreateUser(NewUser),
        GetUser(ResourceId),
        CreateRole(NewRole),
        GetRole(ResourceId),
    }

    #[derive(Clone)]
    enum Reply {
        Json(u16, Value),
        Status(u16),
        Transport,
    }

    impl Reply {
        fn into_result(self) -> Result<ApiResponse, ClientError> {
            match self {
                Reply::Json(status, body) => Ok(ApiResponse::from_json(status, body)),
                Reply::Status(status) => Ok(ApiResponse::empty(status)),
                Reply::Transport => Err(ClientError::Timeout(Duration::from_secs(60))),
            }
        }
    }

    struct FakeApi {
        login: Reply,
        list_roles: Reply,
        list_users: Reply,
        create_user: Reply,
        get_user: Reply,
        create_role: Reply,
        get_role: Reply,
        calls: Mutex<Vec<Call>>,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                login: Reply::Json(200, json!({"accessToken": "tok"})),
                list_roles: Reply::Json(200, json!([{"id": 7, "name": "admin"}])),
                list_users: Reply::Json(200, json!([])),
                create_user: Reply::Json(201, json!({"id": 11})),
                get_user: Reply::Json(200, json!({"id": 11})),
                create_role: Reply::Json(201, json!({"data": {"id": "r-1"}})),
                get_role: Reply::Json(200, json!({"id": "r-1"})),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl FakeApi {
        fn record(&self, call: Call) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl CrudApi for FakeApi {
        async fn login(&self, _credentials: &Credentials) -> Result<ApiResponse, ClientError> {
            self.record(Call::Login);
            self.login.clone().into_result()
        }

        async fn list_roles(&self, token: &str) -> Result<ApiResponse, ClientError> {
            self.record(Call::ListRoles(token.to_string()));
            self.list_roles.clone().into_result()
        }

        async fn list_users(&self, token: &str) -> Result<ApiResponse, ClientError> {
            self.record(Call::ListUsers(token.to_string()));
            self.list_users.clone().into_result()
        }

        async fn create_user(&self, _token: &str, user: &NewUser) -> Result<ApiResponse, ClientError> {
            self.record(Call::CreateUser(user.clone()));
            self.create_user.clone().into_result()
        }

        async fn get_user(&self, _token: &str, id: &ResourceId) -> Result<ApiResponse, ClientError> {
            self.record(Call::GetUser(id.clone()));
            self.get_user.clone().into_result()
        }

        async fn create_role(&self, _token: &str, role: &NewRole) -> Result<ApiResponse, ClientError> {
            self.record(Call::CreateRole(role.clone()));
            self.create_role.clone().into_result()
        }

        async fn get_role(&self, _token: &str, id: &ResourceId) -> Result<ApiResponse, ClientError> {
            self.record(Call::GetRole(id.clone()));
            self.get_role.clone().into_result()
        }
    }

    fn journey(api: FakeApi) -> CrudJourney<FakeApi> {
        CrudJourney::new(api, Credentials::new("admin@email.com", "s3cr3t"), Duration::ZERO)
    }

    fn vu() -> VirtualUser {
        VirtualUser::new(1, Some(42), MetricsCollector::new(), CancellationToken::new())
    }

    /// Shape of the recorded calls, ignoring payloads
    fn kinds(calls: &[Call]) -> Vec<&'static str> {
        calls
            .iter()
            .map(|c| match c {
                Call::Login => "login",
                Call::ListRoles(_) => "list_roles",
                Call::ListUsers(_) => "list_users",
                Call::CreateUser(_) => "create_user",
                Call::GetUser(_) => "get_user",
                Call::CreateRole(_) => "create_role",
                Call::GetRole(_) => "get_role",
            })
            .collect()
    }

    fn check_counts(vu: &VirtualUser, name: &str) -> Option<(u64, u64)> {
        vu.metrics()
            .snapshot()
            .check(name)
            .map(|c| (c.passes, c.fails))
    }

    // =========================================================================
    // Full journey
    // =========================================================================

    #[tokio::test]
    async fn test_happy_path() {
        let journey = journey(FakeApi::default());
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);

        let calls = journey.api.calls();
        assert_eq!(
            kinds(&calls),
            [
                "login",
                "list_roles",
                "list_users",
                "create_user",
                "get_user",
                "create_role",
                "get_role"
            ]
        );
        assert_eq!(calls[1], Call::ListRoles("tok".into()));
        assert_eq!(calls[2], Call::ListUsers("tok".into()));
        assert_eq!(calls[4], Call::GetUser(ResourceId::Number(11)));
        assert_eq!(calls[6], Call::GetRole(ResourceId::Text("r-1".into())));

        for name in checks::ALL {
            assert_eq!(check_counts(&vu, name), Some((1, 0)), "{}", name);
        }
        assert_eq!(vu.metrics().snapshot().total_requests(), 7);
    }

    #[tokio::test]
    async fn test_create_user_body() {
        let journey = journey(FakeApi::default());
        journey.iteration(&mut vu()).await;

        let calls = journey.api.calls();
        let Call::CreateUser(user) = &calls[3] else {
            panic!("expected create_user, got {:?}", calls[3]);
        };
        assert_eq!(user.role_id, ResourceId::Number(7));
        assert_eq!(user.password, "password123");
        assert!(matches_pattern(&user.username, "user_", 5, "@test.com"), "{}", user.username);

        let Call::CreateRole(role) = &calls[5] else {
            panic!("expected create_role, got {:?}", calls[5]);
        };
        assert!(matches_pattern(&role.name, "role_", 4, ""), "{}", role.name);
        assert_eq!(role.description, "Performance test role");
    }

    #[tokio::test]
    async fn test_nested_token() {
        let journey = journey(FakeApi {
            login: Reply::Json(200, json!({"data": {"accessToken": "nested"}})),
            ..Default::default()
        });
        journey.iteration(&mut vu()).await;
        assert_eq!(journey.api.calls()[1], Call::ListRoles("nested".into()));
    }

    #[tokio::test]
    async fn test_numeric_token_and_float_ids() {
        let journey = journey(FakeApi {
            login: Reply::Json(200, json!({"accessToken": 123, "data": {"accessToken": "x"}})),
            list_roles: Reply::Json(200, json!([{"id": 7.0}])),
            create_user: Reply::Json(201, json!({"id": u64::MAX})),
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);

        let calls = journey.api.calls();
        assert_eq!(calls[1], Call::ListRoles("123".into()));
        let Call::CreateUser(user) = &calls[3] else {
            panic!("expected create_user, got {:?}", calls[3]);
        };
        assert_eq!(user.role_id, ResourceId::Number(7));
        let Call::GetUser(user_id) = &calls[4] else {
            panic!("expected get_user, got {:?}", calls[4]);
        };
        assert_eq!(user_id.to_string(), u64::MAX.to_string());
    }

    // =========================================================================
    // Login
    // =========================================================================

    #[tokio::test]
    async fn test_no_token_aborts() {
        let journey = journey(FakeApi {
            login: Reply::Json(200, json!({"message": "ok"})),
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Aborted);
        assert_eq!(journey.api.calls(), [Call::Login]);
        assert_eq!(check_counts(&vu, checks::LOGIN), Some((1, 0)));
        assert_eq!(check_counts(&vu, checks::LIST_ROLES), None);
    }

    #[tokio::test]
    async fn test_rejected_login_aborts() {
        let journey = journey(FakeApi {
            login: Reply::Json(401, json!({"error": "bad credentials"})),
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Aborted);
        assert_eq!(journey.api.calls(), [Call::Login]);
        assert_eq!(check_counts(&vu, checks::LOGIN), Some((0, 1)));
    }

    #[tokio::test]
    async fn test_login_transport_error_aborts() {
        let journey = journey(FakeApi {
            login: Reply::Transport,
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Aborted);
        assert_eq!(check_counts(&vu, checks::LOGIN), Some((0, 1)));

        let snap = vu.metrics().snapshot();
        let login = snap.endpoint("POST /auth/login").expect("login recorded");
        assert_eq!(login.transport_errors, 1);
    }

    #[tokio::test]
    async fn test_token_with_unexpected_status_continues() {
        // The token is taken from the body whatever the status
        let journey = journey(FakeApi {
            login: Reply::Json(202, json!({"accessToken": "tok"})),
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);
        assert_eq!(journey.api.calls().len(), 7);
        assert_eq!(check_counts(&vu, checks::LOGIN), Some((0, 1)));
    }

    // =========================================================================
    // Role selection
    // =========================================================================

    #[tokio::test]
    async fn test_empty_roles_skips_create_user() {
        let journey = journey(FakeApi {
            list_roles: Reply::Json(200, json!([])),
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);
        assert_eq!(
            kinds(&journey.api.calls()),
            ["login", "list_roles", "list_users", "create_role", "get_role"]
        );
        assert_eq!(check_counts(&vu, checks::CREATE_USER), None);
    }

    #[tokio::test]
    async fn test_paged_roles() {
        let journey = journey(FakeApi {
            list_roles: Reply::Json(200, json!({"content": [{"id": 3}], "totalElements": 1})),
            ..Default::default()
        });
        journey.iteration(&mut vu()).await;

        let calls = journey.api.calls();
        let Call::CreateUser(user) = &calls[3] else {
            panic!("expected create_user, got {:?}", calls[3]);
        };
        assert_eq!(user.role_id, ResourceId::Number(3));
    }

    #[tokio::test]
    async fn test_roles_transport_error_continues() {
        let journey = journey(FakeApi {
            list_roles: Reply::Transport,
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);
        assert_eq!(
            kinds(&journey.api.calls()),
            ["login", "list_roles", "list_users", "create_role", "get_role"]
        );
        assert_eq!(check_counts(&vu, checks::LIST_ROLES), Some((0, 1)));
    }

    #[test]
    fn test_pick_role_id() {
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(pick_role_id(&json!([{"id": 5}]), &mut rng), Some(ResourceId::Number(5)));
        assert_eq!(pick_role_id(&json!([]), &mut rng), None);
        assert_eq!(pick_role_id(&json!({"content": []}), &mut rng), None);
        assert_eq!(pick_role_id(&json!([{"name": "no id"}]), &mut rng), None);
        assert_eq!(pick_role_id(&json!([{"id": 0}]), &mut rng), None);
        assert_eq!(pick_role_id(&json!({"error": "x"}), &mut rng), None);
        assert_eq!(pick_role_id(&json!([{"id": "abc"}]), &mut rng), Some("abc".into()));
    }

    #[test]
    fn test_pick_role_id_covers_all_roles() {
        let body = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        let mut rng = StdRng::seed_from_u64(10);

        let picked: std::collections::HashSet<_> = (0..200)
            .filter_map(|_| pick_role_id(&body, &mut rng))
            .collect();
        assert_eq!(picked.len(), 3);
    }

    #[tokio::test]
    async fn test_seeded_role_choice_is_reproducible() {
        let roles: Vec<Value> = (1..=20).map(|id| json!({"id": id})).collect();
        let mut picks = Vec::new();

        for _ in 0..2 {
            let journey = journey(FakeApi {
                list_roles: Reply::Json(200, Value::Array(roles.clone())),
                ..Default::default()
            });
            let mut vu = vu();
            for _ in 0..5 {
                journey.iteration(&mut vu).await;
            }
            let chosen: Vec<_> = journey
                .api
                .calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::CreateUser(user) => Some(user.role_id),
                    _ => None,
                })
                .collect();
            picks.push(chosen);
        }

        assert_eq!(picks[0].len(), 5);
        assert_eq!(picks[0], picks[1]);
    }

    // =========================================================================
    // Create and fetch
    // =========================================================================

    #[tokio::test]
    async fn test_failed_create_user_skips_fetch() {
        let journey = journey(FakeApi {
            create_user: Reply::Json(500, json!({"id": 11})),
            ..Default::default()
        });
        let mut vu = vu();

        journey.iteration(&mut vu).await;
        let calls = journey.api.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::GetUser(_))));
        assert!(calls.iter().any(|c| matches!(c, Call::CreateRole(_))));
        assert_eq!(check_counts(&vu, checks::CREATE_USER), Some((0, 1)));
        assert_eq!(check_counts(&vu, checks::GET_USER), None);
    }

    #[tokio::test]
    async fn test_created_user_without_id_skips_fetch() {
        let journey = journey(FakeApi {
            create_user: Reply::Status(201),
            ..Default::default()
        });
        journey.iteration(&mut vu()).await;

        assert!(
            !journey
                .api
                .calls()
                .iter()
                .any(|c| matches!(c, Call::GetUser(_)))
        );
    }

    #[tokio::test]
    async fn test_create_user_accepts_200() {
        let journey = journey(FakeApi {
            create_user: Reply::Json(200, json!({"data": {"id": 99}})),
            ..Default::default()
        });
        let mut vu = vu();
        journey.iteration(&mut vu).await;

        let calls = journey.api.calls();
        assert_eq!(calls[4], Call::GetUser(ResourceId::Number(99)));
        assert_eq!(check_counts(&vu, checks::CREATE_USER), Some((1, 0)));
    }

    #[tokio::test]
    async fn test_exactly_one_fetch_per_created_user() {
        let journey = journey(FakeApi::default());
        let mut vu = vu();
        for _ in 0..3 {
            journey.iteration(&mut vu).await;
        }

        let fetches = journey
            .api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::GetUser(_)))
            .count();
        assert_eq!(fetches, 3);
    }

    #[tokio::test]
    async fn test_create_role_always_issued() {
        let journey = journey(FakeApi {
            list_roles: Reply::Status(500),
            list_users: Reply::Transport,
            create_user: Reply::Status(400),
            ..Default::default()
        });
        journey.iteration(&mut vu()).await;

        assert!(
            journey
                .api
                .calls()
                .iter()
                .any(|c| matches!(c, Call::CreateRole(_)))
        );
    }

    #[tokio::test]
    async fn test_failed_create_role_skips_fetch() {
        let journey = journey(FakeApi {
            create_role: Reply::Json(409, json!({"id": 5})),
            ..Default::default()
        });
        let mut vu = vu();
        journey.iteration(&mut vu).await;

        assert!(
            !journey
                .api
                .calls()
                .iter()
                .any(|c| matches!(c, Call::GetRole(_)))
        );
        assert_eq!(check_counts(&vu, checks::CREATE_ROLE), Some((0, 1)));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_recorded() {
        let journey = journey(FakeApi {
            get_user: Reply::Status(404),
            get_role: Reply::Transport,
            ..Default::default()
        });
        let mut vu = vu();

        assert_eq!(journey.iteration(&mut vu).await, IterationOutcome::Completed);
        assert_eq!(check_counts(&vu, checks::GET_USER), Some((0, 1)));
        assert_eq!(check_counts(&vu, checks::GET_ROLE), Some((0, 1)));
    }

    #[tokio::test]
    async fn test_usernames_unique_across_iterations() {
        let journey = journey(FakeApi::default());
        let mut vu = vu();
        for _ in 0..50 {
            journey.iteration(&mut vu).await;
        }

        let names: std::collections::HashSet<_> = journey
            .api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateUser(user) => Some(user.username),
                _ => None,
            })
            .collect();
        assert_eq!(names.len(), 50);
    }
}
