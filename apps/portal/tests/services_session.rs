mod common;

use common::{user_json, Harness};
use portal::models::auth::{LoginRequest, RegisterRequest, Registration, ResetPasswordRequest};
use portal::models::user::ProfileUpdate;
use portal::services::{locale, session};
use portal::session::navigation::{HOME_PATH, LOGIN_PATH};
use portal::session::tokens::{TokenPair, REFRESH_TOKEN_COOKIE};
use portal::{
    AuthLevel, ClientError, CookieStore, Locale, Navigator, Permission, ResponseCode, Role,
};
use portal_test_support::MockResponse;
use serde_json::json;

#[actix_web::test]
async fn no_session_is_a_guest() {
    let h = Harness::start().await;
    h.api.respond("GET", "/user/get", MockResponse::no_content());

    let ctx = session::session(&h.state).await.unwrap();

    assert!(!ctx.is_authenticated);
    assert_eq!(ctx.role, Role::Guest);
    assert!(ctx.permissions.is_empty());
}

#[actix_web::test]
async fn session_is_derived_and_cached() {
    let h = Harness::start().await;
    h.sign_in("a", "r");
    h.api
        .respond("GET", "/user/get", MockResponse::json(200, user_json(3, "Moderator")));

    let first = session::session(&h.state).await.unwrap();
    let second = session::session(&h.state).await.unwrap();

    assert_eq!(first, second);
    assert!(first.is_authenticated);
    assert_eq!(first.user_id, Some(3));
    assert_eq!(first.auth_level, AuthLevel::Higher);
    assert!(first.has_permission(Permission::UseModerationPanel));
    assert_eq!(h.api.calls("GET", "/user/get"), 1);
}

#[actix_web::test]
async fn login_stores_tokens_and_goes_home() {
    let h = Harness::start_at(LOGIN_PATH).await;
    h.api
        .respond("POST", "/auth/login", MockResponse::tokens("acc", "ref"))
        .respond("GET", "/user/get", MockResponse::json(200, user_json(5, "Standard")));

    session::login(&h.state, &LoginRequest::new("ayse", "parola123"))
        .await
        .unwrap();

    assert_eq!(h.stored_tokens(), Some(TokenPair::new("acc", "ref")));
    assert!(h.cookies.get(REFRESH_TOKEN_COOKIE).unwrap().unwrap().http_only);
    assert_eq!(h.navigator.history(), vec![HOME_PATH.to_string()]);

    let body = h.api.requests_to("POST", "/auth/login")[0].body.clone().unwrap();
    assert_eq!(body, json!({ "identity": "ayse", "password": "parola123" }));

    let ctx = session::session(&h.state).await.unwrap();
    assert_eq!(ctx.user_id, Some(5));
    assert_eq!(
        h.api.requests_to("GET", "/user/get")[0].bearer.as_deref(),
        Some("acc")
    );
}

#[actix_web::test]
async fn login_invalidates_a_cached_guest_session() {
    let h = Harness::start_at(LOGIN_PATH).await;
    h.api
        .respond_once("GET", "/user/get", MockResponse::no_content())
        .respond("GET", "/user/get", MockResponse::json(200, user_json(5, "Standard")))
        .respond("POST", "/auth/login", MockResponse::tokens("acc", "ref"));

    assert!(!session::session(&h.state).await.unwrap().is_authenticated);
    session::login(&h.state, &LoginRequest::new("ayse", "parola123"))
        .await
        .unwrap();
    assert!(session::session(&h.state).await.unwrap().is_authenticated);
}

#[actix_web::test]
async fn failed_login_leaves_cookies_untouched() {
    let h = Harness::start_at(LOGIN_PATH).await;
    h.api.respond(
        "POST",
        "/auth/login",
        MockResponse::api_error(json!("Unauthenticated"), "Kullanıcı adı veya parola hatalı"),
    );

    let err = session::login(&h.state, &LoginRequest::new("ayse", "yanlis"))
        .await
        .unwrap_err();

    assert_eq!(err.response_code(), Some(ResponseCode::Unauthenticated));
    assert!(h.stored_tokens().is_none());
    assert!(h.navigator.history().is_empty());
}

#[actix_web::test]
async fn login_response_without_tokens_is_rejected() {
    let h = Harness::start_at(LOGIN_PATH).await;
    h.api.respond("POST", "/auth/login", MockResponse::ok());

    let err = session::login(&h.state, &LoginRequest::new("ayse", "parola123"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
    assert!(h.stored_tokens().is_none());
}

#[actix_web::test]
async fn oversized_login_is_rejected_before_sending() {
    let h = Harness::start_at(LOGIN_PATH).await;

    let err = session::login(&h.state, &LoginRequest::new("x".repeat(46), "p"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(h.api.requests().is_empty());
}

#[actix_web::test]
async fn logout_clears_tokens_even_when_the_api_fails() {
    let h = Harness::start().await;
    h.sign_in("acc", "ref");
    h.api
        .respond("POST", "/auth/logout", MockResponse::status(500))
        .respond("GET", "/user/get", MockResponse::json(200, user_json(5, "Standard")));

    session::logout(&h.state).await.unwrap();

    assert!(h.stored_tokens().is_none());
    assert_eq!(h.navigator.history(), vec![LOGIN_PATH.to_string()]);

    let ctx = session::session(&h.state).await.unwrap();
    assert!(!ctx.is_authenticated);
    assert_eq!(h.api.calls("GET", "/user/get"), 0, "guest is seeded, not fetched");
}

#[actix_web::test]
async fn password_registration_asks_for_verification() {
    let h = Harness::start_at("/register").await;
    h.api.respond("POST", "/auth/register", MockResponse::ok());

    let request = RegisterRequest {
        name: "Ayşe".into(),
        surname: "Yılmaz".into(),
        password: Some("parola123".into()),
        oauth_code: None,
        email: "ayse@example.test".into(),
        phone_number: "+905551112233".into(),
        birth_date: None,
    };
    session::register(&h.state, Registration::from(request))
        .await
        .unwrap();

    assert_eq!(h.navigator.history(), vec![LOGIN_PATH.to_string()]);
    assert_eq!(h.notifier.last().unwrap().title, "Kayıt başarılı");
    let body = h.api.requests_to("POST", "/auth/register")[0].body.clone().unwrap();
    assert_eq!(body["phone_number"], "+905551112233");
    assert!(body.get("oauth_code").is_none());
}

#[actix_web::test]
async fn invalid_registration_is_not_sent() {
    let h = Harness::start_at("/register").await;

    let request = RegisterRequest {
        name: "Ayşe".into(),
        surname: "Yılmaz".into(),
        password: Some("parola123".into()),
        oauth_code: Some("abc".into()),
        email: "ayse@example.test".into(),
        phone_number: "+905551112233".into(),
        birth_date: None,
    };
    let err = session::register(&h.state, Registration::from(request))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(h.api.requests().is_empty());
}

#[actix_web::test]
async fn profile_update_refreshes_the_session() {
    let h = Harness::start().await;
    h.sign_in("acc", "ref");
    h.api
        .respond("GET", "/user/get", MockResponse::json(200, user_json(5, "Standard")))
        .respond("PATCH", "/user/update", MockResponse::ok());

    session::session(&h.state).await.unwrap();
    let update = ProfileUpdate {
        description: Some("Rust ile backend geliştiriyorum".into()),
        ..ProfileUpdate::default()
    };
    session::update_profile(&h.state, &update).await.unwrap();
    session::session(&h.state).await.unwrap();

    assert_eq!(h.api.calls("GET", "/user/get"), 2);
    let body = h.api.requests_to("PATCH", "/user/update")[0].body.clone().unwrap();
    assert_eq!(body, json!({ "description": "Rust ile backend geliştiriyorum" }));
}

#[actix_web::test]
async fn password_reset_flow_passes_through() {
    let h = Harness::start_at(LOGIN_PATH).await;
    h.api
        .respond("POST", "/auth/forgot-password", MockResponse::ok())
        .respond("POST", "/auth/reset-password", MockResponse::ok());

    session::forgot_password(&h.state, "ayse@example.test")
        .await
        .unwrap();
    session::reset_password(
        &h.state,
        &ResetPasswordRequest {
            token: "t0k".into(),
            password: "yeniParola1".into(),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        session::forgot_password(&h.state, "not-an-email").await,
        Err(ClientError::Validation(_))
    ));
    assert_eq!(h.api.calls("POST", "/auth/forgot-password"), 1);
    assert_eq!(
        h.api.requests_to("POST", "/auth/reset-password")[0]
            .body
            .clone()
            .unwrap()["token"],
        "t0k"
    );
}

#[actix_web::test]
async fn failures_are_reported_in_the_chosen_language() {
    let h = Harness::start().await;
    h.sign_in("acc", "ref");
    h.api
        .respond("GET", "/user/get", MockResponse::status(401))
        .respond("POST", "/auth/refresh", MockResponse::status(401));
    locale::set_locale(&h.state, Locale::En).unwrap();

    let err = session::session(&h.state).await.unwrap_err();
    h.navigator.navigate("/projects");
    let message = h.state.reporter().report(&err);

    assert_eq!(message.title, "Your session has expired");
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.title, "Your session has expired");
    assert_eq!(notice.description.as_deref(), Some("Please log in again"));
    assert_eq!(h.navigator.current_path(), LOGIN_PATH);
}
