//! Recipes: write-side drafts and patches, read-side views and filters.
//!
//! Handlers collect raw payload values into a [`RecipeInput`]. Creating a
//! recipe converts it into a [`RecipeDraft`], where every field is required;
//! partial updates convert it into a [`RecipePatch`]. Both conversions apply
//! the same collection rules:
//!
//! - at least one ingredient and one tag;
//! - no ingredient or tag listed twice;
//! - amounts and cooking time between 1 and [`QUANTITY_MAX`].

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    ImageUpload, ImageUploadError, Ingredient, IngredientId, RecipeId, Tag, TagId, TagSlug, UserId,
    UserProfile,
};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 200;
/// Upper bound for amounts and cooking time.
pub const QUANTITY_MAX: u32 = 32_767;

/// Validation failures for recipe payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("text must not be empty")]
    EmptyText,
    #[error("cooking_time must be between 1 and {max}")]
    CookingTimeOutOfRange { max: u32 },
    #[error("ingredient amount must be between 1 and {max}")]
    AmountOutOfRange { index: usize, max: u32 },
    #[error("invalid {field} id {value}")]
    InvalidId {
        field: &'static str,
        index: usize,
        value: i64,
    },
    #[error("at least one ingredient is required")]
    NoIngredients,
    #[error("ingredient {id} is listed more than once")]
    DuplicateIngredient { index: usize, id: i64 },
    #[error("at least one tag is required")]
    NoTags,
    #[error("tag {id} is listed more than once")]
    DuplicateTag { index: usize, id: i64 },
    #[error("{0}")]
    Image(ImageUploadError),
}

impl RecipeValidationError {
    /// Payload field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::InvalidId { field, .. } => *field,
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::AmountOutOfRange { .. } | Self::NoIngredients | Self::DuplicateIngredient { .. } => {
                "ingredients"
            }
            Self::NoTags | Self::DuplicateTag { .. } => "tags",
            Self::Image(_) => "image",
        }
    }

    /// Machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::EmptyName | Self::EmptyText | Self::NoIngredients | Self::NoTags => "empty",
            Self::NameTooLong { .. } => "too_long",
            Self::CookingTimeOutOfRange { .. } | Self::AmountOutOfRange { .. } => "out_of_range",
            Self::InvalidId { .. } => "invalid_id",
            Self::DuplicateIngredient { .. } | Self::DuplicateTag { .. } => "duplicate",
            Self::Image(_) => "invalid_image",
        }
    }

    /// Position within a collection field, when relevant.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::AmountOutOfRange { index, .. }
            | Self::InvalidId { index, .. }
            | Self::DuplicateIngredient { index, .. }
            | Self::DuplicateTag { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Minutes needed to cook a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(u32);

impl CookingTime {
    /// Validate a cooking time in minutes.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        bounded(minutes)
            .map(Self)
            .ok_or(RecipeValidationError::CookingTimeOutOfRange { max: QUANTITY_MAX })
    }

    /// Minutes as a plain number.
    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }
}

/// Quantity of an ingredient in its measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u32);

impl Amount {
    /// Validate an amount.
    pub fn new(value: i64) -> Option<Self> {
        bounded(value).map(Self)
    }

    /// Amount as a plain number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

fn bounded(value: i64) -> Option<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (1..=QUANTITY_MAX).contains(v))
}

/// Validated recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeName(String);

impl RecipeName {
    /// Trim and validate a recipe name.
    pub fn new(value: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if trimmed.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// One ingredient line of a recipe being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient: IngredientId,
    pub amount: Amount,
}

/// Raw ingredient line as sent by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientInput {
    pub id: i64,
    pub amount: i64,
}

/// Raw recipe payload. `None` means the field was not sent.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    pub image: Option<String>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub tags: Option<Vec<i64>>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RecipeValidationError> {
    value.ok_or(RecipeValidationError::Missing { field })
}

fn validate_text(value: &str) -> Result<String, RecipeValidationError> {
    if value.trim().is_empty() {
        return Err(RecipeValidationError::EmptyText);
    }
    Ok(value.to_owned())
}

fn validate_image(value: &str) -> Result<ImageUpload, RecipeValidationError> {
    ImageUpload::from_data_url(value).map_err(RecipeValidationError::Image)
}

fn validate_ingredients(
    lines: &[IngredientInput],
) -> Result<Vec<IngredientAmount>, RecipeValidationError> {
    if lines.is_empty() {
        return Err(RecipeValidationError::NoIngredients);
    }
    let mut seen = HashSet::with_capacity(lines.len());
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let ingredient =
                IngredientId::new(line.id).map_err(|_| RecipeValidationError::InvalidId {
                    field: "ingredients",
                    index,
                    value: line.id,
                })?;
            if !seen.insert(ingredient) {
                return Err(RecipeValidationError::DuplicateIngredient { index, id: line.id });
            }
            let amount = Amount::new(line.amount).ok_or(RecipeValidationError::AmountOutOfRange {
                index,
                max: QUANTITY_MAX,
            })?;
            Ok(IngredientAmount { ingredient, amount })
        })
        .collect()
}

fn validate_tags(ids: &[i64]) -> Result<Vec<TagId>, RecipeValidationError> {
    if ids.is_empty() {
        return Err(RecipeValidationError::NoTags);
    }
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .enumerate()
        .map(|(index, raw)| {
            let id = TagId::new(*raw).map_err(|_| RecipeValidationError::InvalidId {
                field: "tags",
                index,
                value: *raw,
            })?;
            if !seen.insert(id) {
                return Err(RecipeValidationError::DuplicateTag { index, id: *raw });
            }
            Ok(id)
        })
        .collect()
}

/// A complete, validated recipe ready to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: RecipeName,
    pub text: String,
    pub cooking_time: CookingTime,
    pub image: ImageUpload,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

impl TryFrom<RecipeInput> for RecipeDraft {
    type Error = RecipeValidationError;

    fn try_from(input: RecipeInput) -> Result<Self, Self::Error> {
        Ok(Self {
            ingredients: validate_ingredients(&required(input.ingredients, "ingredients")?)?,
            tags: validate_tags(&required(input.tags, "tags")?)?,
            image: validate_image(&required(input.image, "image")?)?,
            name: RecipeName::new(&required(input.name, "name")?)?,
            text: validate_text(&required(input.text, "text")?)?,
            cooking_time: CookingTime::new(required(input.cooking_time, "cooking_time")?)?,
        })
    }
}

/// A validated partial update. `ingredients` and `tags` replace the stored
/// collections wholesale when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<RecipeName>,
    pub text: Option<String>,
    pub cooking_time: Option<CookingTime>,
    pub image: Option<ImageUpload>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<TagId>>,
}

impl TryFrom<RecipeInput> for RecipePatch {
    type Error = RecipeValidationError;

    fn try_from(input: RecipeInput) -> Result<Self, Self::Error> {
        Ok(Self {
            ingredients: input
                .ingredients
                .as_deref()
                .map(validate_ingredients)
                .transpose()?,
            tags: input.tags.as_deref().map(validate_tags).transpose()?,
            image: input.image.as_deref().map(validate_image).transpose()?,
            name: input.name.as_deref().map(RecipeName::new).transpose()?,
            text: input.text.as_deref().map(validate_text).transpose()?,
            cooking_time: input.cooking_time.map(CookingTime::new).transpose()?,
        })
    }
}

/// Recipe row to be inserted once its image has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author: UserId,
    pub name: RecipeName,
    pub text: String,
    pub cooking_time: CookingTime,
    pub image_path: String,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

/// Column changes applied by a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: Option<RecipeName>,
    pub text: Option<String>,
    pub cooking_time: Option<CookingTime>,
    pub image_path: Option<String>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<TagId>>,
}

/// Ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: Amount,
}

/// Stored recipe with its author, tags and ingredient lines resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    pub image_path: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Short form used by favorites, the cart and subscription listings.
    #[must_use]
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image_path: self.image_path.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Recipe as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserProfile,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Short recipe representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image_path: String,
    pub cooking_time: CookingTime,
}

/// Criteria for listing recipes. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    /// Match recipes carrying any of these tags.
    pub tags: Vec<TagSlug>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

/// Per-user recipe collections with set semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    /// Human-readable collection name for messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl fmt::Display for RecipeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
