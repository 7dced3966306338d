//! Turns a week of planned meals into a shopping list.
//!
//! Ingredient lines are merged by [`AggregationKey`]: the trimmed, lowercased
//! name plus the unit after spoon measures collapse into pieces. Amounts are
//! summed. The first line seen for a key decides the display name, and the
//! `purchased` / `have_at_home` flags are carried over from a previous list
//! entry with the same key, if there is one.

use std::{collections::HashMap, fmt};

use crate::{
    calendar::repo_types::PlannedMeal,
    shopping::repo_types::{NewShoppingItem, ShoppingItem},
    units::ShoppingUnit,
};

/// Smallest amount a shopping item may carry.
pub const MIN_SHOPPING_AMOUNT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    name: String,
    unit: ShoppingUnit,
}

impl AggregationKey {
    pub fn new(name: &str, unit: ShoppingUnit) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            unit,
        }
    }
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.unit)
    }
}

/// Builds the replacement list for `meals`, in first-encounter order of keys.
pub fn aggregate(meals: &[PlannedMeal], existing: &[ShoppingItem]) -> Vec<NewShoppingItem> {
    let mut carried: HashMap<AggregationKey, (bool, bool)> = HashMap::with_capacity(existing.len());
    for item in existing {
        carried
            .entry(AggregationKey::new(&item.name, item.unit))
            .or_insert((item.purchased, item.have_at_home));
    }

    let mut slots: HashMap<AggregationKey, usize> = HashMap::new();
    let mut out: Vec<NewShoppingItem> = Vec::new();

    for ingredient in meals.iter().flat_map(|m| m.recipe.ingredients.iter()) {
        let unit = ingredient.unit().normalized();
        let key = AggregationKey::new(ingredient.name(), unit);
        if let Some(&idx) = slots.get(&key) {
            out[idx].amount += ingredient.amount();
            continue;
        }
        let (purchased, have_at_home) = carried.get(&key).copied().unwrap_or_default();
        slots.insert(key, out.len());
        out.push(NewShoppingItem {
            name: ingredient.name().trim().to_string(),
            amount: ingredient.amount(),
            unit,
            purchased,
            have_at_home,
        });
    }

    // Stored amounts must be at least 0.1; this is the only adjustment made
    // to the exact sums.
    for item in &mut out {
        if item.amount < MIN_SHOPPING_AMOUNT {
            item.amount = MIN_SHOPPING_AMOUNT;
        }
    }
    out
}
