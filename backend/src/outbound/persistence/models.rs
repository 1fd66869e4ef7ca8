//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the rows so stored values are re-validated on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    CookingTime, Ingredient, IngredientId, RecipeId, RecipeSummary, Tag, TagColor, TagId, TagSlug,
    User, UserId, UserProfileFields,
};

use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading public user columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let profile = UserProfileFields::try_from_parts(
            &row.email,
            &row.username,
            &row.first_name,
            &row.last_name,
        )
        .map_err(|(field, err)| format!("stored user {} has invalid {field}: {err}", row.id))?;
        Ok(User::new(UserId::from_row(row.id), profile, row.is_admin))
    }
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = String;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::TagValidationError| {
            format!("stored tag {} is invalid: {err}", row.id)
        };
        let color = TagColor::new(&row.color).map_err(invalid)?;
        let slug = TagSlug::new(row.slug.as_str()).map_err(invalid)?;
        Tag::new(TagId::from_row(row.id), row.name.as_str(), color, slug).map_err(invalid)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: IngredientId::from_row(row.id),
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// Row struct for reading the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image_path: String,
    pub published_at: DateTime<Utc>,
}

impl RecipeRow {
    pub(crate) fn cooking_time(&self) -> Result<CookingTime, String> {
        CookingTime::new(i64::from(self.cooking_time))
            .map_err(|err| format!("stored recipe {} is invalid: {err}", self.id))
    }
}

/// Columns needed for a recipe preview.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeSummaryRow {
    pub id: i64,
    pub name: String,
    pub image_path: String,
    pub cooking_time: i32,
}

impl TryFrom<RecipeSummaryRow> for RecipeSummary {
    type Error = String;

    fn try_from(row: RecipeSummaryRow) -> Result<Self, Self::Error> {
        let cooking_time = CookingTime::new(i64::from(row.cooking_time))
            .map_err(|err| format!("stored recipe {} is invalid: {err}", row.id))?;
        Ok(Self {
            id: RecipeId::from_row(row.id),
            name: row.name,
            image_path: row.image_path,
            cooking_time,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: i64,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image_path: &'a str,
}

/// Column changes for a partial recipe update. `None` leaves a column as is.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub image_path: Option<&'a str>,
}

impl RecipeChangeset<'_> {
    /// Diesel rejects an `UPDATE` with nothing to set.
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
            && self.image_path.is_none()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: i32,
    pub position: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct NewRecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
    pub position: i32,
}

/// Domain amounts and cooking times fit in `i32` by construction.
pub(crate) fn to_db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row(email: &str) -> UserRow {
        UserRow {
            id: 4,
            email: email.to_owned(),
            username: "ada".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            is_admin: true,
        }
    }

    #[rstest]
    fn user_rows_convert_to_users() {
        let user = User::try_from(user_row("ada@example.com")).expect("valid row");
        assert_eq!(user.id().get(), 4);
        assert!(user.is_admin());
    }

    #[rstest]
    fn corrupt_user_rows_name_the_field() {
        let err = User::try_from(user_row("not-an-email")).expect_err("invalid email");
        assert!(err.contains("stored user 4 has invalid email"));
    }

    #[rstest]
    #[case("#E26C2D", "breakfast", true)]
    #[case("orange", "breakfast", false)]
    #[case("#E26C2D", "Break fast", false)]
    fn tag_rows_are_revalidated(#[case] color: &str, #[case] slug: &str, #[case] valid: bool) {
        let row = TagRow {
            id: 1,
            name: "Breakfast".to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        };
        assert_eq!(Tag::try_from(row).is_ok(), valid);
    }

    #[rstest]
    fn empty_changesets_are_detected() {
        assert!(RecipeChangeset::default().is_empty());
        let changeset = RecipeChangeset {
            cooking_time: Some(5),
            ..RecipeChangeset::default()
        };
        assert!(!changeset.is_empty());
    }
}
