//! Read-only tag and ingredient endpoints.
//!
//! ```text
//! GET /api/tags
//! GET /api/tags/{id}
//! GET /api/ingredients?name=flo
//! GET /api/ingredients/{id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, IngredientId, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{IngredientResponse, TagResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query string accepted by `GET /api/ingredients`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearch {
    /// Case-insensitive substring of the ingredient name.
    pub name: Option<String>,
}

/// List every tag ordered by id.
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tags", body = Vec<TagResponse>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.tags.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Fetch one tag.
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id:\\d+}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TagResponse>> {
    let raw = path.into_inner();
    let id = TagId::new(raw).map_err(|_| Error::not_found(format!("tag {raw} not found")))?;
    Ok(web::Json(state.tags.tag(id).await?.into()))
}

/// Search ingredients by name.
#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Matching ingredients ordered by name", body = Vec<IngredientResponse>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "searchIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn search_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let name = query
        .into_inner()
        .name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());
    let found = state.ingredients.search_ingredients(name).await?;
    Ok(web::Json(
        found.into_iter().map(IngredientResponse::from).collect(),
    ))
}

/// Fetch one ingredient.
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id:\\d+}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let raw = path.into_inner();
    let id = IngredientId::new(raw)
        .map_err(|_| Error::not_found(format!("ingredient {raw} not found")))?;
    Ok(web::Json(state.ingredients.ingredient(id).await?.into()))
}
