//! Response bodies shared by several endpoint modules.
//!
//! Domain types carry no serde derives, so every wire shape lives here or
//! next to the single handler that uses it.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AuthorWithRecipes, Ingredient, RecipeIngredient, RecipeSummary, RecipeView, Tag, User,
    UserProfile,
};

/// Public prefix under which stored images are served.
pub const MEDIA_PREFIX: &str = "/media/";

/// URL clients use to fetch the image stored at `path`.
pub(crate) fn media_url(path: &str) -> String {
    format!("{MEDIA_PREFIX}{path}")
}

/// Account fields returned right after registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().as_ref().to_owned(),
            id: user.id().get(),
            username: user.username().as_ref().to_owned(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
        }
    }
}

/// A user profile relative to the requesting user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requesting user follows this user.
    pub is_subscribed: bool,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let UserResponse {
            email,
            id,
            username,
            first_name,
            last_name,
        } = UserResponse::from(&profile.user);
        Self {
            email,
            id,
            username,
            first_name,
            last_name,
            is_subscribed: profile.is_subscribed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "#E26C2D")]
    pub color: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            color: tag.color.as_ref().to_owned(),
            slug: tag.slug.as_ref().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i64,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// One ingredient line of a recipe.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    #[schema(example = 200)]
    pub amount: u32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount.get(),
        }
    }
}

/// Full recipe as seen by the requesting user.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserProfileResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    #[schema(example = "Pancakes")]
    pub name: String,
    /// URL of the recipe image.
    #[schema(example = "/media/recipes/images/0b8c1f9e-2f44-4d1c-9a55-2d3f5c1b7e11.png")]
    pub image: String,
    pub text: String,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: u32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id.get(),
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: author.into(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: media_url(&recipe.image_path),
            text: recipe.text,
            cooking_time: recipe.cooking_time.minutes(),
        }
    }
}

/// Short recipe card used by lists and subscriptions.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.get(),
            image: media_url(&summary.image_path),
            name: summary.name,
            cooking_time: summary.cooking_time.minutes(),
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorWithRecipesResponse {
    #[serde(flatten)]
    pub profile: UserProfileResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<AuthorWithRecipes> for AuthorWithRecipesResponse {
    fn from(author: AuthorWithRecipes) -> Self {
        Self {
            profile: author.profile.into(),
            recipes: author
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}
