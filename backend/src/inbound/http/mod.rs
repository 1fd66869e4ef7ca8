//! HTTP inbound adapter exposing the REST API.
//!
//! [`configure`] mounts every `/api` endpoint plus `/media`; the server adds
//! health probes, tracing, sessions and Swagger UI around it.

pub mod auth;
pub mod cache_control;
pub mod catalogue;
pub mod dto;
pub mod error;
pub mod health;
pub mod media;
mod paging;
pub mod recipe_lists;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

async fn unknown_endpoint() -> ApiResult<web::Json<()>> {
    Err(Error::not_found("no such endpoint"))
}

/// Register the API routes and extractor configuration.
///
/// Literal segments such as `/users/me` are registered ahead of the
/// `{id}` routes they would otherwise shadow.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(
            web::scope("/api")
                .service(auth::login)
                .service(auth::logout)
                .service(users::register)
                .service(users::list_users)
                .service(users::current_user)
                .service(users::set_password)
                .service(subscriptions::list_subscriptions)
                .service(users::get_user)
                .service(subscriptions::subscribe)
                .service(subscriptions::unsubscribe)
                .service(catalogue::list_tags)
                .service(catalogue::get_tag)
                .service(catalogue::search_ingredients)
                .service(catalogue::get_ingredient)
                .service(recipe_lists::download_shopping_cart)
                .service(recipes::list_recipes)
                .service(recipes::create_recipe)
                .service(recipes::get_recipe)
                .service(recipes::update_recipe)
                .service(recipes::delete_recipe)
                .service(recipe_lists::add_favorite)
                .service(recipe_lists::remove_favorite)
                .service(recipe_lists::add_to_cart)
                .service(recipe_lists::remove_from_cart)
                .default_service(web::to(unknown_endpoint)),
        )
        .service(media::get_image);
}
