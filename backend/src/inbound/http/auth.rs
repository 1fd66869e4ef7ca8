//! Session login and logout handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"cook@example.com","password":"secret"}
//! POST /api/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::login_validation_error;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Authenticate with e-mail and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank e-mail or password", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| login_validation_error(&err))?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    info!(user_id = %user_id, "user logged in");
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    session.purge();
    info!(user_id = %user_id, "user logged out");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TEST_PASSWORD, TestBackend, sign_up};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn login_request(email: &str, password: &str) -> actix_http::Request {
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request()
    }

    #[rstest]
    #[case("   ", "password", "email")]
    #[case("cook@example.com", "", "password")]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;

        let response = actix_test::call_service(&app, login_request(email, password)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], "required");
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;
        sign_up(&app, "ada").await;

        let response =
            actix_test::call_service(&app, login_request("ada@example.com", "not-it-at-all"))
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "invalid credentials");
    }

    #[actix_web::test]
    async fn login_accepts_mixed_case_email() {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;
        sign_up(&app, "grace").await;

        let response =
            actix_test::call_service(&app, login_request(" Grace@Example.com ", TEST_PASSWORD))
                .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn logout_ends_the_session() {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;
        let cook = sign_up(&app, "linus").await;

        let logout_request = actix_test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(cook.cookie.clone())
            .to_request();
        let response = actix_test::call_service(&app, logout_request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| c.into_owned())
            .expect("removal cookie");

        let me = actix_test::TestRequest::get()
            .uri("/api/users/me")
            .cookie(cleared)
            .to_request();
        let response = actix_test::call_service(&app, me).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_requires_a_session() {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;

        let logout_request = actix_test::TestRequest::post()
            .uri("/api/auth/logout")
            .to_request();
        let response = actix_test::call_service(&app, logout_request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
