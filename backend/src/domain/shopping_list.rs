//! Shopping list aggregation and plain-text rendering.
//!
//! Repositories return one [`ShoppingListLine`] per ingredient line of every
//! recipe in a user's cart. [`ShoppingList::aggregate`] sums amounts of the
//! same ingredient and orders the result for display.

use std::collections::HashMap;

use super::IngredientId;

/// Heading of the downloadable shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:\n---";

/// Suggested download file name.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ingredient line taken from a recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub ingredient: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// Aggregated total for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

/// Aggregated shopping list ordered by ingredient name, then unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Sum the amounts of identical ingredients.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{IngredientId, ShoppingList, ShoppingListLine};
    ///
    /// let flour = IngredientId::new(1).expect("valid id");
    /// let line = |amount| ShoppingListLine {
    ///     ingredient: flour,
    ///     name: "flour".to_owned(),
    ///     measurement_unit: "g".to_owned(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate(vec![line(200), line(500)]);
    /// assert_eq!(list.render(), "Shopping list:\n---\n1. flour: 700 (g)\n");
    /// ```
    pub fn aggregate(lines: impl IntoIterator<Item = ShoppingListLine>) -> Self {
        let mut totals: HashMap<IngredientId, ShoppingListEntry> = HashMap::new();
        for line in lines {
            totals
                .entry(line.ingredient)
                .and_modify(|entry| entry.total += u64::from(line.amount))
                .or_insert_with(|| ShoppingListEntry {
                    name: line.name.clone(),
                    measurement_unit: line.measurement_unit.clone(),
                    total: u64::from(line.amount),
                });
        }
        let mut entries: Vec<ShoppingListEntry> = totals.into_values().collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
        });
        Self { entries }
    }

    /// Aggregated entries in display order.
    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    /// Whether the cart contributed no ingredients.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the numbered plain-text list.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{SHOPPING_LIST_HEADER}\n");
        for (position, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}: {} ({})\n",
                position + 1,
                entry.name,
                entry.total,
                entry.measurement_unit
            ));
        }
        out
    }
}
