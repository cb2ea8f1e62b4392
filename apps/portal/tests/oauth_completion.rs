mod common;

use common::Harness;
use portal::auth::oauth::{OAuthFailure, OAuthService};
use portal::models::auth::{GStatus, OAuthCompleteQuery};
use portal::services::session;
use portal::Navigator;
use portal::session::navigation::{DASHBOARD_PATH, LOGIN_PATH, REGISTER_PATH};
use portal::session::tokens::TokenPair;
use portal_test_support::MockResponse;
use serde_json::json;

const CALLBACK: &str = "https://portal.example/oauth/complete";

#[actix_web::test]
async fn provided_tokens_are_stored() {
    let h = Harness::start_at("/oauth/complete").await;

    let dest = session::complete_oauth_url(&h.state, &format!("{CALLBACK}?status=3&token=acc&rtoken=ref"))
        .await
        .unwrap();

    assert_eq!(dest, DASHBOARD_PATH);
    assert_eq!(h.stored_tokens(), Some(TokenPair::new("acc", "ref")));
    assert_eq!(h.navigator.history(), vec![DASHBOARD_PATH.to_string()]);
}

#[actix_web::test]
async fn missing_refresh_token_goes_to_login() {
    let h = Harness::start_at("/oauth/complete").await;

    let failure = session::complete_oauth_url(&h.state, &format!("{CALLBACK}?status=3&token=acc"))
        .await
        .unwrap_err();

    assert_eq!(failure, OAuthFailure::MissingTokens);
    assert!(h.stored_tokens().is_none());
    assert_eq!(h.navigator.current_path(), LOGIN_PATH);
    assert_eq!(h.notifier.notices().len(), 1);
}

#[actix_web::test]
async fn new_users_are_registered_with_the_provider_code() {
    let h = Harness::start_at("/oauth/complete").await;
    h.api.respond("POST", "/auth/register", MockResponse::ok());

    let url = format!(
        "{CALLBACK}?status=2&name=Ay%C5%9Fe&surname=Y%C4%B1lmaz&email=ayse%40example.test&vcode=v-123"
    );
    let dest = session::complete_oauth_url(&h.state, &url).await.unwrap();

    assert_eq!(dest, DASHBOARD_PATH);
    let body = h.api.requests_to("POST", "/auth/register")[0].body.clone().unwrap();
    assert_eq!(
        body,
        json!({
            "name": "Ayşe",
            "surname": "Yılmaz",
            "email": "ayse@example.test",
            "oauth_code": "v-123"
        })
    );
}

#[actix_web::test]
async fn failed_registration_goes_back_to_register() {
    let h = Harness::start_at("/oauth/complete").await;
    h.api.respond(
        "POST",
        "/auth/register",
        MockResponse::api_error(json!(6), "Bu e-posta zaten kayıtlı"),
    );

    let mut query = OAuthCompleteQuery::new(GStatus::SuccessfulUserNeedsRegister);
    query.name = Some("Ayşe".into());
    query.surname = Some("Yılmaz".into());
    query.email = Some("ayse@example.test".into());
    query.vcode = Some("v-123".into());

    let failure = session::complete_oauth(&h.state, &query).await.unwrap_err();

    assert!(matches!(failure, OAuthFailure::RegistrationFailed { .. }));
    assert_eq!(h.navigator.current_path(), REGISTER_PATH);
}

#[actix_web::test]
async fn incomplete_profile_goes_to_register_without_calling_the_api() {
    let h = Harness::start_at("/oauth/complete").await;

    let failure = session::complete_oauth_url(&h.state, &format!("{CALLBACK}?status=2&name=Ay%C5%9Fe"))
        .await
        .unwrap_err();

    assert_eq!(failure, OAuthFailure::MissingUserInfo);
    assert_eq!(h.navigator.current_path(), REGISTER_PATH);
    assert!(h.api.requests().is_empty());
}

#[actix_web::test]
async fn provider_errors_go_to_login() {
    let h = Harness::start_at("/oauth/complete").await;

    let failure = session::complete_oauth_url(&h.state, &format!("{CALLBACK}?status=0&code=access_denied"))
        .await
        .unwrap_err();

    assert_eq!(
        failure,
        OAuthFailure::AuthenticationError {
            code: Some("access_denied".into())
        }
    );
    assert_eq!(h.navigator.current_path(), LOGIN_PATH);
}

#[actix_web::test]
async fn unparsable_callback_goes_to_login() {
    let h = Harness::start_at("/oauth/complete").await;

    for url in [
        format!("{CALLBACK}?status=abc"),
        format!("{CALLBACK}?token=acc"),
        "not a url".to_string(),
    ] {
        let failure = session::complete_oauth_url(&h.state, &url).await.unwrap_err();
        assert_eq!(failure, OAuthFailure::InvalidParams, "{url}");
    }
    assert_eq!(h.navigator.redirect_count(LOGIN_PATH), 3);
}

#[actix_web::test]
async fn redirect_urls_point_at_the_api() {
    let h = Harness::start().await;
    let url = portal::api::auth::oauth_redirect_url(h.state.client(), OAuthService::Microsoft);
    assert_eq!(url, format!("{}/auth/oauth/microsoft/redirect", h.api.base_url()));
}
