//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are called by
//! inbound adapters. Driven ports (`*Repository`, [`ImageStore`],
//! [`PasswordHasher`]) are implemented by outbound adapters and expose typed
//! errors so services can map failures predictably.

mod macros;
pub(crate) use macros::define_port_error;

mod image_store;
mod ingredient_repository;
mod login_service;
mod password_hasher;
mod recipe_list_repository;
mod recipe_repository;
mod recipes;
mod reference_data_query;
mod subscription_repository;
mod subscriptions;
mod tag_repository;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError, StoredImage};
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use ingredient_repository::{IngredientRepository, IngredientRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use recipe_list_repository::MockRecipeListRepository;
pub use recipe_list_repository::{RecipeListRepository, RecipeListRepositoryError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
pub use recipes::{RecipesCommand, RecipesQuery};
pub use reference_data_query::{IngredientsQuery, TagsQuery};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
pub use subscriptions::{SubscriptionsCommand, SubscriptionsQuery};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::UsersCommand;
pub use users_query::UsersQuery;
