//! Author subscriptions.

use super::{RecipeSummary, UserProfile};

/// A followed author together with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorWithRecipes {
    pub profile: UserProfile,
    /// Newest recipes first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Number of recipes the author has published in total.
    pub recipes_count: u64,
}

/// How many recipe previews to include per author; `None` means all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipesLimit(Option<u32>);

impl RecipesLimit {
    /// Include every recipe.
    pub const ALL: Self = Self(None);

    /// Limit previews to `limit` recipes.
    #[must_use]
    pub const fn at_most(limit: u32) -> Self {
        Self(Some(limit))
    }

    /// The limit, if any.
    #[must_use]
    pub const fn get(self) -> Option<u32> {
        self.0
    }
}

impl Default for RecipesLimit {
    fn default() -> Self {
        Self::ALL
    }
}
