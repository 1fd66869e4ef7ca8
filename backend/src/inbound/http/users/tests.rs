//! Tests for users API handlers.

use super::*;
use crate::inbound::http::test_utils::{TEST_PASSWORD, TestBackend, log_in, sign_up};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn register_request(body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(body)
        .to_request()
}

fn valid_registration() -> Value {
    json!({
        "email": "ada@example.com",
        "username": "ada",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password": TEST_PASSWORD,
    })
}

#[actix_web::test]
async fn register_returns_account_without_subscription_flag() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let response = actix_test::call_service(&app, register_request(valid_registration())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["username"], "ada");
    assert_eq!(body["first_name"], "Ada");
    assert!(body["id"].as_i64().is_some_and(|id| id > 0));
    assert!(body.get("is_subscribed").is_none());
    assert!(body.get("password").is_none());
}

#[rstest]
#[case("email", json!("not-an-email"), "invalid_format")]
#[case("username", json!("me"), "reserved")]
#[case("username", json!("bad name!"), "invalid_format")]
#[case("password", json!("12345678901"), "entirely_numeric")]
#[case("password", json!("short"), "too_short")]
#[actix_web::test]
async fn register_rejects_invalid_fields(
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let mut body = valid_registration();
    body[field] = value;

    let response = actix_test::call_service(&app, register_request(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
}

#[rstest]
#[case("email", json!({"username": "other"}))]
#[case("username", json!({"email": "other@example.com"}))]
#[actix_web::test]
async fn register_rejects_duplicates(#[case] field: &str, #[case] overrides: Value) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let first = actix_test::call_service(&app, register_request(valid_registration())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut body = valid_registration();
    if let (Some(target), Some(changes)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    let response = actix_test::call_service(&app, register_request(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], "duplicate");
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let response = actix_test::call_service(&app, register_request(json!({"email": 3}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["code"], "invalid_request");
}

#[actix_web::test]
async fn list_users_is_paginated_with_links() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    for name in ["ada", "grace", "linus"] {
        sign_up(&app, name).await;
    }

    let request = actix_test::TestRequest::get()
        .uri("/api/users?page=2&limit=1")
        .insert_header(("host", "food.example"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"][0]["username"], "grace");
    assert_eq!(body["results"][0]["is_subscribed"], false);
    assert_eq!(
        body["next"],
        "http://food.example/api/users?page=3&limit=1"
    );
    assert_eq!(
        body["previous"],
        "http://food.example/api/users?page=1&limit=1"
    );
}

#[actix_web::test]
async fn list_users_rejects_zero_page() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/users?page=0")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn me_requires_login_and_returns_own_profile() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let anonymous = actix_test::TestRequest::get()
        .uri("/api/users/me")
        .to_request();
    let response = actix_test::call_service(&app, anonymous).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let ada = sign_up(&app, "ada").await;
    let request = actix_test::TestRequest::get()
        .uri("/api/users/me")
        .cookie(ada.cookie.clone())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], ada.id.get());
    assert_eq!(body["is_subscribed"], false);
}

#[rstest]
#[case("/api/users/999")]
#[case("/api/users/0")]
#[actix_web::test]
async fn unknown_user_is_not_found(#[case] uri: &str) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn profile_reports_subscription_of_viewer() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let grace = sign_up(&app, "grace").await;

    let subscribe = actix_test::TestRequest::post()
        .uri(&format!("/api/users/{}/subscribe", grace.id))
        .cookie(ada.cookie.clone())
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, subscribe).await.status(),
        StatusCode::CREATED
    );

    let as_ada = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{}", grace.id))
        .cookie(ada.cookie.clone())
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, as_ada).await;
    assert_eq!(body["is_subscribed"], true);

    let anonymous = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{}", grace.id))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, anonymous).await;
    assert_eq!(body["is_subscribed"], false);
}

#[actix_web::test]
async fn set_password_replaces_the_login_secret() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/users/set_password")
        .cookie(ada.cookie.clone())
        .set_json(&SetPasswordRequest {
            current_password: TEST_PASSWORD.into(),
            new_password: "a-brand-new-secret".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    log_in(&app, "ada@example.com", "a-brand-new-secret").await;
}

#[rstest]
#[case("wrong-current-pass", "a-brand-new-secret", "current_password", "incorrect")]
#[case(TEST_PASSWORD, "98765432", "new_password", "entirely_numeric")]
#[case("", "a-brand-new-secret", "current_password", "required")]
#[actix_web::test]
async fn set_password_rejects_bad_input(
    #[case] current: &str,
    #[case] new: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/users/set_password")
        .cookie(ada.cookie.clone())
        .set_json(&SetPasswordRequest {
            current_password: current.into(),
            new_password: new.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
}
