//! Tests for recipe handlers.

use super::*;
use crate::inbound::http::test_utils::{
    PNG_DATA_URL, SignedUp, TestBackend, publish_recipe, recipe_body, seed_ingredient, sign_up,
};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

async fn get_json<S>(app: &S, uri: &str, user: Option<&SignedUp>) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::get().uri(uri);
    if let Some(user) = user {
        request = request.cookie(user.cookie.clone());
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    actix_test::read_body_json(response).await
}

fn names(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|recipe| recipe["name"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn create_returns_the_full_recipe() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/recipes")
        .cookie(ada.cookie.clone())
        .set_json(recipe_body("Pancakes", flour, 250))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["cooking_time"], 15);
    assert_eq!(body["author"]["username"], "ada");
    assert_eq!(body["author"]["is_subscribed"], false);
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert_eq!(body["ingredients"][0]["name"], "flour");
    assert_eq!(body["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(body["ingredients"][0]["amount"], 250);
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);
    let image = body["image"].as_str().expect("image url");
    assert!(image.starts_with("/media/"), "unexpected image url {image}");
    assert!(image.ends_with(".png"), "unexpected image url {image}");
}

#[actix_web::test]
async fn create_requires_login() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(recipe_body("Pancakes", 1, 250))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("ingredients", json!([]), "empty", None)]
#[case("ingredients", json!([{"id": 1, "amount": 5}, {"id": 1, "amount": 7}]), "duplicate", Some(1))]
#[case("ingredients", json!([{"id": 1, "amount": 0}]), "out_of_range", Some(0))]
#[case("ingredients", json!([{"id": 999, "amount": 5}]), "unknown", Some(0))]
#[case("tags", json!([]), "empty", None)]
#[case("tags", json!([1, 1]), "duplicate", Some(1))]
#[case("tags", json!([77]), "unknown", Some(0))]
#[case("cooking_time", json!(0), "out_of_range", None)]
#[case("image", json!("https://example.com/cat.png"), "invalid_image", None)]
#[case("image", Value::Null, "missing_field", None)]
#[case("name", json!("   "), "empty", None)]
#[actix_web::test]
async fn create_rejects_invalid_bodies(
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
    #[case] index: Option<usize>,
) {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    assert_eq!(flour, 1);
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let mut body = recipe_body("Pancakes", flour, 250);
    body[field] = value;

    let request = actix_test::TestRequest::post()
        .uri("/api/recipes")
        .cookie(ada.cookie.clone())
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
    match index {
        Some(index) => assert_eq!(payload["details"]["index"], index),
        None => assert!(payload["details"].get("index").is_none()),
    }
}

#[rstest]
#[case("/api/recipes/999")]
#[case("/api/recipes/0")]
#[actix_web::test]
async fn unknown_recipe_is_not_found(#[case] uri: &str) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_is_newest_first_and_paginated() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    for name in ["Bread", "Scones", "Pancakes"] {
        publish_recipe(&app, &ada, recipe_body(name, flour, 100)).await;
    }

    let body = get_json(&app, "/api/recipes?limit=2", None).await;
    assert_eq!(body["count"], 3);
    assert_eq!(names(&body), ["Pancakes", "Scones"]);
    assert!(body["next"].as_str().is_some_and(|next| next.ends_with("page=2&limit=2")));
    assert!(body["previous"].is_null());

    let body = get_json(&app, "/api/recipes?page=2&limit=2", None).await;
    assert_eq!(names(&body), ["Bread"]);
    assert!(body["next"].is_null());
}

#[actix_web::test]
async fn list_filters_by_author_and_any_tag() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let grace = sign_up(&app, "grace").await;
    publish_recipe(&app, &ada, recipe_body("Porridge", flour, 50)).await;
    let mut lunch = recipe_body("Sandwich", flour, 80);
    lunch["tags"] = json!([2]);
    publish_recipe(&app, &grace, lunch).await;
    let mut dinner = recipe_body("Pie", flour, 300);
    dinner["tags"] = json!([3]);
    publish_recipe(&app, &grace, dinner).await;

    let body = get_json(&app, &format!("/api/recipes?author={}", grace.id), None).await;
    assert_eq!(names(&body), ["Pie", "Sandwich"]);

    let body = get_json(&app, "/api/recipes?tags=breakfast&tags=dinner", None).await;
    assert_eq!(names(&body), ["Pie", "Porridge"]);
    assert!(
        body["next"].is_null(),
        "single page expected for two matches"
    );

    let body = get_json(&app, "/api/recipes?tags=brunch", None).await;
    assert_eq!(body["count"], 0);
}

#[rstest]
#[case("/api/recipes?author=abc", "author")]
#[case("/api/recipes?author=-3", "author")]
#[case("/api/recipes?tags=Not%20A%20Slug", "tags")]
#[case("/api/recipes?limit=0", "limit")]
#[actix_web::test]
async fn list_rejects_invalid_filters(#[case] uri: &str, #[case] field: &str) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
}

#[actix_web::test]
async fn list_flags_only_apply_to_authenticated_viewers() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let favourite = publish_recipe(&app, &ada, recipe_body("Waffles", flour, 100)).await;
    publish_recipe(&app, &ada, recipe_body("Muffins", flour, 100)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/recipes/{favourite}/favorite"))
        .cookie(ada.cookie.clone())
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::CREATED
    );

    let body = get_json(&app, "/api/recipes?is_favorited=1", Some(&ada)).await;
    assert_eq!(names(&body), ["Waffles"]);
    assert_eq!(body["results"][0]["is_favorited"], true);

    let body = get_json(&app, "/api/recipes?is_favorited=yes", Some(&ada)).await;
    assert_eq!(body["count"], 2);

    let body = get_json(&app, "/api/recipes?is_favorited=true", None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["is_favorited"], false);

    let body = get_json(&app, "/api/recipes?is_in_shopping_cart=1", Some(&ada)).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn only_the_author_may_patch_or_delete() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let grace = sign_up(&app, "grace").await;
    let id = publish_recipe(&app, &ada, recipe_body("Pancakes", flour, 250)).await;
    let uri = format!("/api/recipes/{id}");

    let patch = actix_test::TestRequest::patch()
        .uri(&uri)
        .cookie(grace.cookie.clone())
        .set_json(json!({"name": "Stolen"}))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, patch).await.status(),
        StatusCode::FORBIDDEN
    );
    let delete = actix_test::TestRequest::delete()
        .uri(&uri)
        .cookie(grace.cookie.clone())
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, delete).await.status(),
        StatusCode::FORBIDDEN
    );

    let delete = actix_test::TestRequest::delete()
        .uri(&uri)
        .cookie(ada.cookie.clone())
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, delete).await.status(),
        StatusCode::NO_CONTENT
    );
    let get = actix_test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        actix_test::call_service(&app, get).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn patch_keeps_absent_fields_and_replaces_collections() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let milk = seed_ingredient(&backend.store, "milk", "ml").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let id = publish_recipe(&app, &ada, recipe_body("Pancakes", flour, 250)).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/recipes/{id}"))
        .cookie(ada.cookie.clone())
        .set_json(json!({
            "name": "Crepes",
            "ingredients": [{"id": milk, "amount": 300}],
            "tags": [2, 3],
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], "Crepes");
    assert_eq!(body["text"], "Mix and cook.");
    assert_eq!(body["cooking_time"], 15);
    assert_eq!(body["ingredients"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["ingredients"][0]["name"], "milk");
    assert_eq!(body["tags"][0]["slug"], "lunch");
    assert_eq!(body["tags"][1]["slug"], "dinner");
}

#[actix_web::test]
async fn patch_validates_present_fields() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let id = publish_recipe(&app, &ada, recipe_body("Pancakes", flour, 250)).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/recipes/{id}"))
        .cookie(ada.cookie.clone())
        .set_json(json!({"ingredients": []}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], "ingredients");
}

#[actix_web::test]
async fn administrators_may_edit_any_recipe() {
    let backend = TestBackend::new();
    let flour = seed_ingredient(&backend.store, "flour", "g").await;
    let app = actix_test::init_service(backend.app()).await;
    let ada = sign_up(&app, "ada").await;
    let admin = sign_up(&app, "admin").await;
    assert!(backend.store.set_admin(admin.id, true));
    let id = publish_recipe(&app, &ada, recipe_body("Pancakes", flour, 250)).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/recipes/{id}"))
        .cookie(admin.cookie.clone())
        .set_json(json!({"image": PNG_DATA_URL, "cooking_time": 20}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["cooking_time"], 20);
    assert_eq!(body["author"]["username"], "ada");
}
