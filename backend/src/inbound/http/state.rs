//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ImageStore, IngredientRepository, IngredientsQuery, LoginService, PasswordHasher,
    RecipeListRepository, RecipeRepository, RecipesCommand, RecipesQuery,
    SubscriptionRepository, SubscriptionsCommand, SubscriptionsQuery, TagRepository, TagsQuery,
    UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    RecipeAdapters, RecipesService, ReferenceDataService, SubscriptionsService, UsersService,
};

/// Driven adapters the HTTP state is assembled from.
///
/// The server fills this with Diesel repositories or the in-memory store;
/// handler tests always use the latter.
#[derive(Clone)]
pub struct HttpStateAdapters {
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub lists: Arc<dyn RecipeListRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub images: Arc<dyn ImageStore>,
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn UsersCommand>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub tags: Arc<dyn TagsQuery>,
    pub ingredients: Arc<dyn IngredientsQuery>,
    /// Read access to stored images for the media endpoint.
    pub images: Arc<dyn ImageStore>,
}

impl HttpState {
    /// Wire the domain services over `adapters`.
    ///
    /// # Examples
    /// ```no_run
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// use foodgram::inbound::http::state::{HttpState, HttpStateAdapters};
    /// use foodgram::outbound::media::CapStdImageStore;
    /// use foodgram::outbound::memory::MemoryStore;
    /// use foodgram::outbound::security::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let images = CapStdImageStore::open(Path::new("media")).expect("media root");
    /// let state = HttpState::from_adapters(HttpStateAdapters {
    ///     users: store.clone(),
    ///     subscriptions: store.clone(),
    ///     recipes: store.clone(),
    ///     lists: store.clone(),
    ///     tags: store.clone(),
    ///     ingredients: store,
    ///     images: Arc::new(images),
    ///     hasher: Arc::new(BcryptPasswordHasher::new(DEFAULT_BCRYPT_COST)),
    /// });
    /// let _tags = state.tags.clone();
    /// ```
    pub fn from_adapters(adapters: HttpStateAdapters) -> Self {
        let HttpStateAdapters {
            users,
            subscriptions,
            recipes,
            lists,
            tags,
            ingredients,
            images,
            hasher,
        } = adapters;

        let accounts = Arc::new(UsersService::new(
            users.clone(),
            subscriptions.clone(),
            hasher,
        ));
        let following = Arc::new(SubscriptionsService::new(
            users.clone(),
            subscriptions.clone(),
            recipes.clone(),
        ));
        let cookbook = Arc::new(RecipesService::new(RecipeAdapters {
            recipes,
            lists,
            users,
            subscriptions,
            tags: tags.clone(),
            ingredients: ingredients.clone(),
            images: images.clone(),
        }));
        let reference = Arc::new(ReferenceDataService::new(tags, ingredients));

        Self {
            login: accounts.clone(),
            users: accounts.clone(),
            accounts,
            subscriptions: following.clone(),
            subscriptions_query: following,
            recipes: cookbook.clone(),
            recipes_query: cookbook,
            tags: reference.clone(),
            ingredients: reference,
            images,
        }
    }
}
