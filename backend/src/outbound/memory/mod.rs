//! In-process repositories used when no database is configured.
//!
//! [`MemoryStore`] implements every repository port over one mutex-guarded
//! state value, mirroring the relational constraints of the PostgreSQL
//! schema: unique e-mails, usernames, list pairs and subscriptions, cascading
//! recipe deletes and ingredient references that must exist. Cloning the
//! store shares the underlying state.

mod catalogue;
mod recipes;
mod users;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::{
    CookingTime, Ingredient, IngredientAmount, IngredientId, PasswordHash, RecipeId, Tag, TagColor,
    TagId, TagSlug, User, UserId, UserProfileFields,
};

const POISONED: &str = "in-memory store lock poisoned";

/// Tags every fresh store starts with, matching the seed migration.
pub const DEFAULT_TAGS: [(&str, &str, &str); 3] = [
    ("Breakfast", "#E26C2D", "breakfast"),
    ("Lunch", "#49B64E", "lunch"),
    ("Dinner", "#8775D2", "dinner"),
];

struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Clone)]
struct StoredRecipe {
    author: UserId,
    name: String,
    text: String,
    cooking_time: CookingTime,
    image_path: String,
    published_at: DateTime<Utc>,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

#[derive(Default)]
struct State {
    last_user_id: i64,
    users: BTreeMap<UserId, StoredUser>,
    tags: BTreeMap<TagId, Tag>,
    last_ingredient_id: i64,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    last_recipe_id: i64,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    favorites: BTreeSet<(UserId, RecipeId)>,
    shopping_cart: BTreeSet<(UserId, RecipeId)>,
    /// `(follower, author)` pairs.
    subscriptions: BTreeSet<(UserId, UserId)>,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

/// Shared in-memory implementation of the repository ports.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create a store seeded with [`DEFAULT_TAGS`].
    pub fn new() -> Self {
        let store = Self {
            state: Arc::new(Mutex::new(State::default())),
        };
        if let Ok(mut state) = store.state.lock() {
            for (raw_id, (name, color, slug)) in (1_i64..).zip(DEFAULT_TAGS) {
                let id = TagId::from_row(raw_id);
                let (Ok(color), Ok(slug)) = (TagColor::new(color), TagSlug::new(slug)) else {
                    continue;
                };
                if let Ok(tag) = Tag::new(id, name, color, slug) {
                    state.tags.insert(id, tag);
                }
            }
        }
        store
    }

    /// Grant or revoke administrator rights. Returns `false` for unknown
    /// users.
    ///
    /// The relational store manages the flag directly in the `users` table.
    pub fn set_admin(&self, id: UserId, is_admin: bool) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        let Some(stored) = state.users.get_mut(&id) else {
            return false;
        };
        let profile = UserProfileFields {
            email: stored.user.email().clone(),
            username: stored.user.username().clone(),
            first_name: stored.user.first_name().clone(),
            last_name: stored.user.last_name().clone(),
        };
        stored.user = User::new(id, profile, is_admin);
        true
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
