//! API trait definition

use std::future::Future;

use crate::error::ClientError;
use crate::models::{Credentials, NewRole, NewUser, ResourceId};
use crate::response::ApiResponse;

/// Operations of the CRUD API exercised by the load test
///
/// `Ok` carries any HTTP status; `Err` means no response was received.
/// [`ApiClient`](crate::ApiClient) is the HTTP implementation.
pub trait CrudApi: Send + Sync {
    /// `POST /auth/login`
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `GET /roles`
    fn list_roles(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `GET /users`
    fn list_users(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `POST /users`
    fn create_user(
        &self,
        token: &str,
        user: &NewUser,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `GET /users/{id}`
    fn get_user(
        &self,
        token: &str,
        id: &ResourceId,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `POST /roles`
    fn create_role(
        &self,
        token: &str,
        role: &NewRole,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// `GET /roles/{id}`
    fn get_role(
        &self,
        token: &str,
        id: &ResourceId,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}
