use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::recipes::repo_types::{Ingredient, IngredientRow};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown meal slot `{0}`")]
pub struct UnknownSlot(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl FromStr for MealSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            other => Err(UnknownSlot(other.to_string())),
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipe as seen from the calendar: only what shopping needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRecipe {
    pub id: Uuid,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

/// A calendar entry with its recipe ingredients resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedMeal {
    pub id: Uuid,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub slot: MealSlot,
    pub recipe: PlannedRecipe,
}

#[derive(Debug, Clone, FromRow)]
pub struct CalendarEntryRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub date: Date,
    pub slot: String,
    pub created_at: OffsetDateTime,
}

/// One row of the planned meal / ingredient join. Ingredient columns are
/// null for recipes without ingredients.
#[derive(Debug, Clone, FromRow)]
pub struct PlannedIngredientRow {
    pub meal_id: Uuid,
    pub date: Date,
    pub slot: String,
    pub recipe_id: Uuid,
    pub title: String,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl PlannedIngredientRow {
    pub fn ingredient(&self) -> anyhow::Result<Option<Ingredient>> {
        match (&self.name, self.amount, &self.unit) {
            (Some(name), Some(amount), Some(unit)) => Ok(Some(Ingredient::try_from(IngredientRow {
                name: name.clone(),
                amount,
                unit: unit.clone(),
            })?)),
            _ => Ok(None),
        }
    }
}
