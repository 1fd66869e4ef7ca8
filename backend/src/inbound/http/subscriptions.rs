//! Author subscription endpoints.
//!
//! ```text
//! GET /api/users/subscriptions?page=1&limit=5&recipes_limit=3
//! POST /api/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/users/{id}/subscribe
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::{PageParams, Paginated};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::domain::{Error, RecipesLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::AuthorWithRecipesResponse;
use crate::inbound::http::paging::paginated;
use crate::inbound::http::schemas::{ErrorSchema, PaginatedSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::user_id_from_path;
use crate::inbound::http::validation::{FieldName, page_request, parse_positive};

/// Recipe preview size accepted by subscription endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitQuery {
    /// Maximum number of recipes listed per author; all when absent.
    #[param(value_type = Option<u32>)]
    pub recipes_limit: Option<String>,
}

impl RecipesLimitQuery {
    fn limit(&self) -> Result<RecipesLimit, Error> {
        match self.recipes_limit.as_deref() {
            None | Some("") => Ok(RecipesLimit::ALL),
            Some(raw) => parse_positive(raw, FieldName::new("recipes_limit"))
                .map(RecipesLimit::at_most),
        }
    }
}

/// List the authors the current user follows.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        RecipesLimitQuery
    ),
    responses(
        (status = 200, description = "Followed authors", body = PaginatedSchema<AuthorWithRecipesResponse>),
        (status = 400, description = "Invalid pagination or recipes_limit", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PageParams>,
    preview: web::Query<RecipesLimitQuery>,
) -> ApiResult<web::Json<Paginated<AuthorWithRecipesResponse>>> {
    let user_id = session.require_user_id()?;
    let request = page_request(params.into_inner())?;
    let limit = preview.limit()?;
    let page = state
        .subscriptions_query
        .subscriptions(user_id, request, limit)
        .await?;
    Ok(web::Json(paginated(&req, page, request)?))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    params(("id" = i64, Path, description = "Author id"), RecipesLimitQuery),
    responses(
        (status = 201, description = "Subscribed", body = AuthorWithRecipesResponse),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "subscribe"
)]
#[post("/users/{id:\\d+}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    preview: web::Query<RecipesLimitQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let author = user_id_from_path(path.into_inner())?;
    let limit = preview.limit()?;
    let followed = state
        .subscriptions
        .subscribe(user_id, author, limit)
        .await?;
    info!(user_id = %user_id, author_id = %author, "subscribed");
    Ok(HttpResponse::Created().json(AuthorWithRecipesResponse::from(followed)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown author or not subscribed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id:\\d+}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let author = user_id_from_path(path.into_inner())?;
    state.subscriptions.unsubscribe(user_id, author).await?;
    info!(user_id = %user_id, author_id = %author, "unsubscribed");
    Ok(HttpResponse::NoContent().finish())
}
