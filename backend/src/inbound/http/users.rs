//! Users API handlers.
//!
//! ```text
//! POST /api/users {"email":..,"username":..,"first_name":..,"last_name":..,"password":..}
//! GET /api/users?page=1&limit=5
//! GET /api/users/me
//! GET /api/users/{id}
//! POST /api/users/set_password {"current_password":..,"new_password":..}
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use pagination::{PageParams, Paginated};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Password, PasswordChange, Registration, UserId, UserProfileFields};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{UserProfileResponse, UserResponse};
use crate::inbound::http::paging::paginated;
use crate::inbound::http::schemas::{ErrorSchema, PaginatedSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    page_request, password_change_error, user_validation_error,
};

/// Sign-up request body for `POST /api/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let profile = UserProfileFields::try_from_parts(
            &value.email,
            &value.username,
            &value.first_name,
            &value.last_name,
        )
        .map_err(|(field, err)| user_validation_error(field, &err))?;
        let password =
            Password::new(&value.password).map_err(|err| user_validation_error("password", &err))?;
        Ok(Self { profile, password })
    }
}

/// Password change body for `POST /api/users/set_password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Resolve a path id, treating non-positive values as unknown users.
pub(crate) fn user_id_from_path(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid field or duplicate e-mail/username", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    info!(user_id = %user.id(), "user registered");
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// List users ordered by id.
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Users", body = PaginatedSchema<UserProfileResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<UserProfileResponse>>> {
    let viewer = session.user_id()?;
    let request = page_request(params.into_inner())?;
    let page = state.users.list_users(viewer, request).await?;
    Ok(web::Json(paginated(&req, page, request)?))
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own profile", body = UserProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.users.user_profile(Some(user_id), user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UserProfileResponse::from(profile)))
}

/// Fetch one user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserProfileResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id:\\d+}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserProfileResponse>> {
    let viewer = session.user_id()?;
    let id = user_id_from_path(path.into_inner())?;
    let profile = state.users.user_profile(viewer, id).await?;
    Ok(web::Json(profile.into()))
}

/// Replace the authenticated user's password.
#[utoipa::path(
    post,
    path = "/api/users/set_password",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setPassword"
)]
#[post("/users/set_password")]
pub async fn set_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let SetPasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let change = PasswordChange::try_from_parts(&current_password, &new_password)
        .map_err(|(field, err)| password_change_error(field, &err))?;
    state.accounts.set_password(user_id, &change).await?;
    info!(user_id = %user_id, "password changed");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
