//! Builders for the HTTP state from the configured driven adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use foodgram::inbound::http::state::{HttpState, HttpStateAdapters};
use foodgram::outbound::media::CapStdImageStore;
use foodgram::outbound::memory::MemoryStore;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeListRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselTagRepository, DieselUserRepository,
};
use foodgram::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Repository adapters sharing one backing store.
fn diesel_adapters(
    pool: &DbPool,
    images: Arc<CapStdImageStore>,
    hasher: Arc<BcryptPasswordHasher>,
) -> HttpStateAdapters {
    HttpStateAdapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        lists: Arc::new(DieselRecipeListRepository::new(pool.clone())),
        tags: Arc::new(DieselTagRepository::new(pool.clone())),
        ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
        images,
        hasher,
    }
}

fn memory_adapters(
    store: &Arc<MemoryStore>,
    images: Arc<CapStdImageStore>,
    hasher: Arc<BcryptPasswordHasher>,
) -> HttpStateAdapters {
    HttpStateAdapters {
        users: store.clone(),
        subscriptions: store.clone(),
        recipes: store.clone(),
        lists: store.clone(),
        tags: store.clone(),
        ingredients: store.clone(),
        images,
        hasher,
    }
}

/// Build the shared HTTP state, using Diesel repositories when a pool is
/// configured and the in-memory store otherwise.
///
/// # Errors
///
/// Returns the I/O error raised while opening the media root.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let images = Arc::new(CapStdImageStore::open(&config.media_root)?);
    let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    info!(
        media_root = %config.media_root.display(),
        bcrypt_cost = config.bcrypt_cost,
        "media and password hashing configured"
    );

    let adapters = match &config.db_pool {
        Some(pool) => diesel_adapters(pool, images, hasher),
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            memory_adapters(&Arc::new(MemoryStore::new()), images, hasher)
        }
    };
    Ok(web::Data::new(HttpState::from_adapters(adapters)))
}
