//! `/auth` endpoints.

use crate::auth::oauth::OAuthService;
use crate::error::ClientError;
use crate::http::client::ApiClient;
use crate::http::request::Method;
use crate::models::api::{BasicResponse, TokenResponse};
use crate::models::auth::{
    EmailRequest, LoginRequest, LogoutRequest, Registration, ResetPasswordRequest,
};

fn require<T>(body: Option<T>, endpoint: &str) -> Result<T, ClientError> {
    body.ok_or_else(|| ClientError::decode(format!("{endpoint} returned no content")))
}

/// `POST /auth/login`
pub async fn login(client: &ApiClient, req: &LoginRequest) -> Result<TokenResponse, ClientError> {
    let res = client.mutate(Method::Post, "/auth/login", req).await?;
    require(res, "/auth/login")
}

/// `POST /auth/logout`
pub async fn logout(client: &ApiClient, req: &LogoutRequest) -> Result<(), ClientError> {
    client
        .mutate::<_, BasicResponse>(Method::Post, "/auth/logout", req)
        .await?;
    Ok(())
}

/// `POST /auth/register`
pub async fn register(client: &ApiClient, req: &Registration) -> Result<(), ClientError> {
    client
        .mutate::<_, BasicResponse>(Method::Post, "/auth/register", req)
        .await?;
    Ok(())
}

/// `POST /auth/forgot-password`
pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<(), ClientError> {
    let body = EmailRequest {
        email: email.to_string(),
    };
    client
        .mutate::<_, BasicResponse>(Method::Post, "/auth/forgot-password", &body)
        .await?;
    Ok(())
}

/// `POST /auth/reset-password`
pub async fn reset_password(
    client: &ApiClient,
    req: &ResetPasswordRequest,
) -> Result<(), ClientError> {
    client
        .mutate::<_, BasicResponse>(Method::Post, "/auth/reset-password", req)
        .await?;
    Ok(())
}

/// `POST /auth/resend-verification`
pub async fn resend_verification(client: &ApiClient, email: &str) -> Result<(), ClientError> {
    let body = EmailRequest {
        email: email.to_string(),
    };
    client
        .mutate::<_, BasicResponse>(Method::Post, "/auth/resend-verification", &body)
        .await?;
    Ok(())
}

/// `GET /auth/status`. A 204 reads as signed out.
pub async fn status(client: &ApiClient) -> Result<bool, ClientError> {
    Ok(client.fetch::<bool>("/auth/status").await?.unwrap_or(false))
}

pub fn oauth_redirect_url(client: &ApiClient, service: OAuthService) -> String {
    service.redirect_url(client.base_url())
}
