//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::domain::UserId;
use crate::inbound::http::state::{HttpState, HttpStateAdapters};
use crate::outbound::media::CapStdImageStore;
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::{BcryptPasswordHasher, MIN_BCRYPT_COST};

/// Password used by every account created through [`sign_up`].
pub const TEST_PASSWORD: &str = "kitchen-secret-1";

/// 1x1 transparent PNG as a data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory backend for handler tests. Keep it alive for the whole test;
/// dropping it removes the media directory.
pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<HttpState>,
    _media: TempDir,
}

impl TestBackend {
    pub fn new() -> Self {
        let media = TempDir::new().expect("media tempdir");
        let images = CapStdImageStore::open(media.path()).expect("open media root");
        let store = Arc::new(MemoryStore::new());
        let state = HttpState::from_adapters(HttpStateAdapters {
            users: store.clone(),
            subscriptions: store.clone(),
            recipes: store.clone(),
            lists: store.clone(),
            tags: store.clone(),
            ingredients: store.clone(),
            images: Arc::new(images),
            hasher: Arc::new(BcryptPasswordHasher::new(MIN_BCRYPT_COST)),
        });
        Self {
            store,
            state: web::Data::new(state),
            _media: media,
        }
    }

    /// The complete API wired the way the server wires it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(test_session_middleware())
            .configure(crate::inbound::http::configure)
    }
}

/// A registered and logged-in test account.
pub struct SignedUp {
    pub id: UserId,
    pub cookie: Cookie<'static>,
}

/// Register `username` (e-mail `<username>@example.com`) and log in.
pub async fn sign_up<S>(app: &S, username: &str) -> SignedUp
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let email = format!("{username}@example.com");
    let register = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "Cook",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    let raw_id = body["id"].as_i64().expect("registered id");

    SignedUp {
        id: UserId::new(raw_id).expect("positive id"),
        cookie: log_in(app, &email, TEST_PASSWORD).await,
    }
}

/// Log in and return the session cookie.
pub async fn log_in<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed");
    response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Seed one ingredient and return its id.
pub async fn seed_ingredient(store: &MemoryStore, name: &str, unit: &str) -> i64 {
    use crate::domain::NewIngredient;
    use crate::domain::ports::IngredientRepository;

    let candidate = NewIngredient::new(name, unit).expect("valid ingredient");
    IngredientRepository::import(store, &[candidate])
        .await
        .expect("import ingredient");
    IngredientRepository::search(store, Some(name.to_owned()))
        .await
        .expect("search ingredient")
        .into_iter()
        .find(|found| found.name == name && found.measurement_unit == unit)
        .map(|found| found.id.get())
        .expect("seeded ingredient present")
}

/// Publish a recipe through the API and return its id.
pub async fn publish_recipe<S>(app: &S, author: &SignedUp, body: Value) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/recipes")
        .cookie(author.cookie.clone())
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    created["id"].as_i64().expect("recipe id")
}

/// A valid recipe body using `ingredient` and the seeded breakfast tag.
pub fn recipe_body(name: &str, ingredient: i64, amount: i64) -> Value {
    json!({
        "ingredients": [{ "id": ingredient, "amount": amount }],
        "tags": [1],
        "image": PNG_DATA_URL,
        "name": name,
        "text": "Mix and cook.",
        "cooking_time": 15,
    })
}
