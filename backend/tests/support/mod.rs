//! Shared helpers for the PostgreSQL integration tests.
//!
//! Suites run against the server named by `FOODGRAM_TEST_DATABASE_URL` and
//! skip when it is unset. Every [`TestDatabase`] lives in its own freshly
//! migrated schema, so suites can run in parallel against one database.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use diesel::{Connection, PgConnection, RunQueryDsl};
use foodgram::inbound::http::configure;
use foodgram::inbound::http::state::{HttpState, HttpStateAdapters};
use foodgram::outbound::media::CapStdImageStore;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeListRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselTagRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use foodgram::outbound::security::{BcryptPasswordHasher, MIN_BCRYPT_COST};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use uuid::Uuid;

/// Environment variable naming the PostgreSQL server used by these suites.
pub const TEST_DATABASE_URL_ENV: &str = "FOODGRAM_TEST_DATABASE_URL";

/// Password used by every account created through [`sign_up`].
pub const TEST_PASSWORD: &str = "kitchen-secret-1";

/// 1x1 transparent PNG as a data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// A migrated schema private to one test, dropped on `Drop`.
pub struct TestDatabase {
    admin_url: String,
    schema: String,
    pub pool: DbPool,
}

impl TestDatabase {
    /// Provision a schema, or `None` (with a skip marker) when no test
    /// database is configured.
    pub async fn provision() -> Option<Self> {
        let Some(admin_url) = std::env::var(TEST_DATABASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
        else {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL_ENV} is not set");
            return None;
        };

        let schema = format!("foodgram_test_{}", Uuid::new_v4().simple());
        let mut conn = PgConnection::establish(&admin_url).expect("connect to test database");
        diesel::sql_query(format!("CREATE SCHEMA {schema}"))
            .execute(&mut conn)
            .expect("create test schema");

        let scoped_url = scoped_url(&admin_url, &schema);
        run_pending_migrations(&scoped_url)
            .await
            .expect("apply migrations to test schema");
        let pool = DbPool::new(
            PoolConfig::new(&scoped_url)
                .with_max_size(2)
                .with_min_idle(Some(1)),
        )
        .await
        .expect("create test pool");

        Some(Self {
            admin_url,
            schema,
            pool,
        })
    }

    /// HTTP state wired over the Diesel repositories of this schema.
    pub fn http_state(&self, media: &TempDir) -> web::Data<HttpState> {
        let images = CapStdImageStore::open(media.path()).expect("open media root");
        web::Data::new(HttpState::from_adapters(HttpStateAdapters {
            users: Arc::new(DieselUserRepository::new(self.pool.clone())),
            subscriptions: Arc::new(DieselSubscriptionRepository::new(self.pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(self.pool.clone())),
            lists: Arc::new(DieselRecipeListRepository::new(self.pool.clone())),
            tags: Arc::new(DieselTagRepository::new(self.pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(self.pool.clone())),
            images: Arc::new(images),
            hasher: Arc::new(BcryptPasswordHasher::new(MIN_BCRYPT_COST)),
        }))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        match PgConnection::establish(&self.admin_url) {
            Ok(mut conn) => {
                if let Err(error) =
                    diesel::sql_query(format!("DROP SCHEMA {} CASCADE", self.schema))
                        .execute(&mut conn)
                {
                    eprintln!("failed to drop test schema {}: {error}", self.schema);
                }
            }
            Err(error) => eprintln!("failed to reconnect to drop {}: {error}", self.schema),
        }
    }
}

/// Append a `search_path` option so every connection lands in `schema`.
fn scoped_url(base: &str, schema: &str) -> String {
    let mut url = Url::parse(base).expect("test database URL is a valid URL");
    url.query_pairs_mut()
        .append_pair("options", &format!("-csearch_path={schema}"));
    url.into()
}

/// The complete API over `state`, with cookie sessions.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                .cookie_name("session".to_owned())
                .cookie_secure(false)
                .build(),
        )
        .configure(configure)
}

/// Register `username` (e-mail `<username>@example.com`), log in and return
/// the account id with its session cookie.
pub async fn sign_up<S>(app: &S, username: &str) -> (i64, Cookie<'static>)
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
    let registered: Value = actix_test::call_and_read_body_json(app, register).await;
    let id = registered["id"].as_i64().expect("registered id");

    let login = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, login).await;
    assert!(response.status().is_success(), "login failed");
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    (id, cookie)
}
