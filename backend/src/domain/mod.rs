//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed recipe-sharing entities used by the HTTP
//! and persistence adapters, and the services implementing the driving ports
//! on top of the driven ports. Domain types carry no serde or OpenAPI
//! derives; adapters own their wire formats.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - Users: [`User`], [`Registration`], [`LoginCredentials`], [`UserProfile`].
//! - Catalogue: [`Tag`], [`Ingredient`].
//! - Recipes: [`RecipeDraft`], [`RecipePatch`], [`RecipeView`],
//!   [`ShoppingList`].
//! - [`ports`]: hexagon boundary traits.

pub mod auth;
pub mod error;
pub mod ids;
pub mod image;
pub mod ingredient;
pub mod ports;
pub mod recipe;
mod recipes_service;
mod reference_data_service;
pub mod shopping_list;
pub mod subscription;
mod subscriptions_service;
pub mod tag;
pub mod trace_id;
pub mod user;
mod users_service;

pub use self::auth::{LoginCredentials, LoginValidationError, PasswordChange, PasswordChangeError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IngredientId, InvalidId, RecipeId, TagId, UserId};
pub use self::image::{IMAGE_MAX_BYTES, ImageFormat, ImageUpload, ImageUploadError};
pub use self::ingredient::{
    INGREDIENT_TEXT_MAX, ImportSummary, Ingredient, IngredientValidationError, NewIngredient,
};
pub use self::recipe::{
    Amount, CookingTime, IngredientAmount, IngredientInput, NewRecipe, QUANTITY_MAX,
    RECIPE_NAME_MAX, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeIngredient,
    RecipeInput, RecipeList, RecipeName, RecipePatch, RecipeSummary, RecipeValidationError,
    RecipeView,
};
pub use self::recipes_service::{RecipeAdapters, RecipesService};
pub use self::reference_data_service::ReferenceDataService;
pub use self::shopping_list::{
    SHOPPING_LIST_FILENAME, SHOPPING_LIST_HEADER, ShoppingList, ShoppingListEntry,
    ShoppingListLine,
};
pub use self::subscription::{AuthorWithRecipes, RecipesLimit};
pub use self::subscriptions_service::SubscriptionsService;
pub use self::tag::{DEFAULT_TAG_COLOR, Tag, TagColor, TagSlug, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, Password, PasswordHash, PersonName, Registration, User, UserProfile,
    UserProfileFields, UserValidationError, Username,
};
pub use self::users_service::UsersService;
