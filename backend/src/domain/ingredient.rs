//! Ingredients and their measurement units.

use super::IngredientId;

/// Maximum length of ingredient names and units.
pub const INGREDIENT_TEXT_MAX: usize = 200;

/// Validation errors for ingredient fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientValidationError {
    #[error("ingredient {field} must not be empty")]
    Empty { field: &'static str },
    #[error("ingredient {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// A stored ingredient. `(name, measurement_unit)` pairs are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// An ingredient awaiting insertion, e.g. from a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewIngredient {
    name: String,
    measurement_unit: String,
}

impl NewIngredient {
    /// Validate and trim both fields.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::NewIngredient;
    ///
    /// let flour = NewIngredient::new(" flour ", "g").expect("valid ingredient");
    /// assert_eq!(flour.name(), "flour");
    /// ```
    pub fn new(name: &str, measurement_unit: &str) -> Result<Self, IngredientValidationError> {
        Ok(Self {
            name: checked("name", name)?,
            measurement_unit: checked("measurement_unit", measurement_unit)?,
        })
    }

    /// Ingredient name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Unit amounts are measured in.
    pub fn measurement_unit(&self) -> &str {
        self.measurement_unit.as_str()
    }
}

fn checked(field: &'static str, value: &str) -> Result<String, IngredientValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngredientValidationError::Empty { field });
    }
    if trimmed.chars().count() > INGREDIENT_TEXT_MAX {
        return Err(IngredientValidationError::TooLong {
            field,
            max: INGREDIENT_TEXT_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Outcome of a bulk ingredient import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows newly inserted.
    pub inserted: usize,
    /// Rows skipped because the pair already existed.
    pub skipped: usize,
}
