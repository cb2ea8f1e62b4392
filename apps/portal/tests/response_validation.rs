mod common;

use common::Harness;
use portal::models::api::BasicResponse;
use portal::models::admin::FeatureList;
use portal::{ClientError, ResponseCode};
use portal_test_support::MockResponse;
use serde_json::json;

#[actix_web::test]
async fn failed_envelope_becomes_api_error_and_never_data() {
    let h = Harness::start().await;
    h.api.respond(
        "GET",
        "/admin/feature/all",
        MockResponse::json(
            200,
            json!({
                "code": 6,
                "message": "Kayıt zaten mevcut",
                "codes": { "email": 12 },
                "data": { "beta": true }
            }),
        ),
    );

    let err = h
        .state
        .client()
        .fetch::<FeatureList>("/admin/feature/all")
        .await
        .unwrap_err();

    match err {
        ClientError::Api {
            code,
            message,
            codes,
            status,
        } => {
            assert_eq!(code, ResponseCode::Exists);
            assert_eq!(message, "Kayıt zaten mevcut");
            assert_eq!(codes.get("email"), Some(&12));
            assert_eq!(status, 200);
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[actix_web::test]
async fn codes_are_accepted_by_name() {
    let h = Harness::start().await;
    h.api.respond(
        "GET",
        "/admin/feature/all",
        MockResponse::json(200, json!({ "code": "Forbidden" })),
    );

    let err = h
        .state
        .client()
        .fetch::<FeatureList>("/admin/feature/all")
        .await
        .unwrap_err();
    assert_eq!(err.response_code(), Some(ResponseCode::Forbidden));
    assert_eq!(err.to_string(), "An API error occurred.");
}

#[actix_web::test]
async fn no_content_is_an_empty_result() {
    let h = Harness::start().await;
    h.api.respond("GET", "/user/get", MockResponse::no_content());

    let user = h
        .state
        .client()
        .fetch_unwrapped::<portal::models::user::User>("/user/get")
        .await
        .unwrap();
    assert!(user.is_none());
}

#[actix_web::test]
async fn non_success_status_is_a_transport_error() {
    let h = Harness::start().await;
    h.api.respond(
        "POST",
        "/admin/feature/clean",
        MockResponse::json(403, json!({ "code": 0 })),
    );

    let err = h
        .state
        .client()
        .mutate_empty::<BasicResponse>(portal::http::request::Method::Post, "/admin/feature/clean")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 403 }));
}

#[actix_web::test]
async fn malformed_body_is_a_decode_error() {
    let h = Harness::start().await;
    h.api.respond(
        "GET",
        "/admin/feature/all",
        MockResponse::data(json!(["not", "a", "map"])),
    );

    let err = h
        .state
        .client()
        .fetch::<FeatureList>("/admin/feature/all")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[actix_web::test]
async fn unknown_route_is_not_found() {
    let h = Harness::start().await;
    let err = h
        .state
        .client()
        .fetch::<FeatureList>("/nowhere")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}
