//! Strongly typed numeric identifiers for persisted entities.
//!
//! Every table uses a positive `BIGINT` key. Wrapping the raw value keeps a
//! recipe id from being passed where a user id is expected.

use std::fmt;

/// Validation error for identifiers that are zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a positive integer, got {value}")]
pub struct InvalidId {
    kind: &'static str,
    value: i64,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            /// Validate a client supplied identifier.
            pub fn new(value: i64) -> Result<Self, InvalidId> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(InvalidId { kind: $kind, value })
                }
            }

            /// Wrap a key read back from storage.
            pub(crate) const fn from_row(value: i64) -> Self {
                Self(value)
            }

            /// Raw key value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId,
    "user"
);
define_id!(
    /// Identifier of a tag.
    TagId,
    "tag"
);
define_id!(
    /// Identifier of an ingredient.
    IngredientId,
    "ingredient"
);
define_id!(
    /// Identifier of a recipe.
    RecipeId,
    "recipe"
);
