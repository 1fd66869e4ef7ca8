//! Favourites and shopping cart endpoints.
//!
//! ```text
//! POST /api/recipes/{id}/favorite
//! DELETE /api/recipes/{id}/favorite
//! POST /api/recipes/{id}/shopping_cart
//! DELETE /api/recipes/{id}/shopping_cart
//! GET /api/recipes/download_shopping_cart
//! ```

use actix_web::http::header::{
    self, ContentDisposition, ContentType, DispositionParam, DispositionType,
};
use actix_web::{HttpResponse, delete, get, post, web};
use tracing::info;

use crate::domain::{RecipeList, SHOPPING_LIST_FILENAME};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::RecipeSummaryResponse;
use crate::inbound::http::recipes::recipe_id_from_path;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn add(
    state: &HttpState,
    session: &SessionContext,
    raw_id: i64,
    list: RecipeList,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = recipe_id_from_path(raw_id)?;
    let summary = state.recipes.add_to_list(user_id, list, id).await?;
    info!(user_id = %user_id, recipe_id = %id, list = list.label(), "recipe added to list");
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from(summary)))
}

async fn remove(
    state: &HttpState,
    session: &SessionContext,
    raw_id: i64,
    list: RecipeList,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = recipe_id_from_path(raw_id)?;
    state.recipes.remove_from_list(user_id, list, id).await?;
    info!(user_id = %user_id, recipe_id = %id, list = list.label(), "recipe removed from list");
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the current user's favourites.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 400, description = "Already a favourite", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id:\\d+}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add(&state, &session, path.into_inner(), RecipeList::Favorites).await
}

/// Remove a recipe from the current user's favourites.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe or not a favourite", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id:\\d+}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove(&state, &session, path.into_inner(), RecipeList::Favorites).await
}

/// Add a recipe to the current user's shopping cart.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 400, description = "Already in the cart", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id:\\d+}/shopping_cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add(&state, &session, path.into_inner(), RecipeList::ShoppingCart).await
}

/// Remove a recipe from the current user's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe or not in the cart", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id:\\d+}/shopping_cart")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove(&state, &session, path.into_inner(), RecipeList::ShoppingCart).await
}

/// Download the aggregated shopping list as a text attachment.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    responses(
        (
            status = 200,
            description = "Shopping list",
            content_type = "text/plain",
            body = String,
            headers(("Content-Disposition" = String, description = "Attachment file name"))
        ),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let list = state.recipes_query.shopping_list(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .insert_header(private_no_cache_header())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(SHOPPING_LIST_FILENAME.to_owned())],
        })
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(list.render()))
}
