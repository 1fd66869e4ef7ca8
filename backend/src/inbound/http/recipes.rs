//! Recipe endpoints.
//!
//! ```text
//! GET /api/recipes?page=1&limit=5&author=2&tags=breakfast&tags=lunch&is_favorited=1
//! POST /api/recipes {"ingredients":[{"id":1,"amount":200}],"tags":[1],"image":"data:..",..}
//! GET /api/recipes/{id}
//! PATCH /api/recipes/{id} {"name":"Crepes"}
//! DELETE /api/recipes/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::{PageParams, Paginated};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::form_urlencoded;
use utoipa::ToSchema;

use crate::domain::{
    Error, IngredientInput, RecipeDraft, RecipeFilter, RecipeId, RecipeInput, RecipePatch,
    TagSlug, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::RecipeResponse;
use crate::inbound::http::paging::paginated;
use crate::inbound::http::schemas::{ErrorSchema, PaginatedSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_error, page_request, parse_flag, recipe_validation_error,
};

/// One `{id, amount}` ingredient line of a recipe body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 200)]
    pub amount: i64,
}

/// Recipe body for create and partial update. Every field is optional on
/// `PATCH`; `POST` requires all of them.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    /// Tag ids.
    #[schema(example = json!([1, 2]))]
    pub tags: Option<Vec<i64>>,
    /// `data:image/<ext>;base64,<payload>`.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: Option<String>,
    #[schema(example = "Pancakes")]
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: Option<i64>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(value: RecipeRequest) -> Self {
        Self {
            name: value.name,
            text: value.text,
            cooking_time: value.cooking_time,
            image: value.image,
            ingredients: value.ingredients.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| IngredientInput {
                        id: line.id,
                        amount: line.amount,
                    })
                    .collect()
            }),
            tags: value.tags,
        }
    }
}

/// Resolve a path id, treating non-positive values as unknown recipes.
pub(crate) fn recipe_id_from_path(raw: i64) -> Result<RecipeId, Error> {
    RecipeId::new(raw).map_err(|_| Error::not_found(format!("recipe {raw} not found")))
}

/// Build the list filter from the raw query string.
///
/// `tags` may repeat. The list flags only apply to an authenticated viewer.
fn recipe_filter(query: &str, viewer: Option<UserId>) -> Result<RecipeFilter, Error> {
    let mut filter = RecipeFilter::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "author" => {
                let author = value
                    .parse::<i64>()
                    .ok()
                    .and_then(|raw| UserId::new(raw).ok())
                    .ok_or_else(|| {
                        field_error(
                            FieldName::new("author"),
                            "invalid_integer",
                            "author must be a positive integer",
                        )
                    })?;
                filter.author = Some(author);
            }
            "tags" => {
                let slug = TagSlug::new(value.as_ref()).map_err(|err| {
                    field_error(FieldName::new("tags"), "invalid_format", err.to_string())
                })?;
                filter.tags.push(slug);
            }
            "is_favorited" if parse_flag(&value) => filter.favorited_by = viewer,
            "is_in_shopping_cart" if parse_flag(&value) => filter.in_cart_of = viewer,
            _ => {}
        }
    }
    Ok(filter)
}

/// List recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("author" = Option<i64>, Query, description = "Only recipes by this author"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; repeat to match any of several"),
        ("is_favorited" = Option<String>, Query, description = "`1` or `true` for the viewer's favourites"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "`1` or `true` for the viewer's cart")
    ),
    responses(
        (status = 200, description = "Recipes", body = PaginatedSchema<RecipeResponse>),
        (status = 400, description = "Invalid filter or pagination", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<RecipeResponse>>> {
    let viewer = session.user_id()?;
    let request = page_request(params.into_inner())?;
    let filter = recipe_filter(req.query_string(), viewer)?;
    let page = state.recipes_query.list(viewer, filter, request).await?;
    Ok(web::Json(paginated(&req, page, request)?))
}

/// Publish a recipe.
#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation failure", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = RecipeDraft::try_from(RecipeInput::from(payload.into_inner()))
        .map_err(|err| recipe_validation_error(&err))?;
    let view = state.recipes.create(user_id, draft).await?;
    info!(user_id = %user_id, recipe_id = %view.recipe.id, "recipe published");
    Ok(HttpResponse::Created().json(RecipeResponse::from(view)))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id:\\d+}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let viewer = session.user_id()?;
    let id = recipe_id_from_path(path.into_inner())?;
    let view = state.recipes_query.get(viewer, id).await?;
    Ok(web::Json(view.into()))
}

/// Partially update a recipe.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation failure", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id:\\d+}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user_id = session.require_user_id()?;
    let id = recipe_id_from_path(path.into_inner())?;
    let patch = RecipePatch::try_from(RecipeInput::from(payload.into_inner()))
        .map_err(|err| recipe_validation_error(&err))?;
    let view = state.recipes.update(user_id, id, patch).await?;
    info!(user_id = %user_id, recipe_id = %id, "recipe updated");
    Ok(web::Json(view.into()))
}

/// Delete a recipe.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id:\\d+}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = recipe_id_from_path(path.into_inner())?;
    state.recipes.delete(user_id, id).await?;
    info!(user_id = %user_id, recipe_id = %id, "recipe deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
