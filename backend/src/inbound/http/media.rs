//! Serves stored recipe images.
//!
//! ```text
//! GET /media/recipes/images/0b8c1f9e-2f44-4d1c-9a55-2d3f5c1b7e11.png
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::immutable_media_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Fetch a stored image by its relative path.
#[utoipa::path(
    get,
    path = "/media/{path}",
    params(("path" = String, Path, description = "Relative image path")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*", body = Vec<u8>),
        (status = 404, description = "No image at this path", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "getImage",
    security([])
)]
#[get("/media/{path:.*}")]
pub async fn get_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let path = path.into_inner();
    let image = state
        .images
        .load(&path)
        .await?
        .ok_or_else(|| Error::not_found(format!("image {path} not found")))?;
    Ok(HttpResponse::Ok()
        .content_type(image.format.mime())
        .insert_header(immutable_media_header())
        .body(image.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestBackend, recipe_body, seed_ingredient, sign_up};
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn recipe_images_are_served_from_their_url() {
        let backend = TestBackend::new();
        let flour = seed_ingredient(&backend.store, "flour", "g").await;
        let app = actix_test::init_service(backend.app()).await;
        let ada = sign_up(&app, "ada").await;

        let create = actix_test::TestRequest::post()
            .uri("/api/recipes")
            .cookie(ada.cookie.clone())
            .set_json(recipe_body("Pancakes", flour, 250))
            .to_request();
        let created: Value = actix_test::call_and_read_body_json(&app, create).await;
        let url = created["image"].as_str().expect("image url").to_owned();

        let request = actix_test::TestRequest::get().uri(&url).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("image/png")
        );
        let body = actix_test::read_body(response).await;
        assert!(body.starts_with(b"\x89PNG"));
    }

    #[rstest]
    #[case("/media/recipes/images/missing.png")]
    #[case("/media/../Cargo.toml")]
    #[case("/media/recipes/images/notes.txt")]
    #[actix_web::test]
    async fn unknown_or_invalid_paths_are_not_found(#[case] uri: &str) {
        let backend = TestBackend::new();
        let app = actix_test::init_service(backend.app()).await;

        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
