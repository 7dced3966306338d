use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::units::RecipeUnit;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidIngredient {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("amount of `{0}` must be a positive number")]
    NonPositiveAmount(String),
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    name: String,
    amount: f64,
    unit: RecipeUnit,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: RecipeUnit) -> Result<Self, InvalidIngredient> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidIngredient::EmptyName);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(InvalidIngredient::NonPositiveAmount(name));
        }
        Ok(Self { name, amount, unit })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> RecipeUnit {
        self.unit
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct IngredientRow {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = anyhow::Error;

    fn try_from(r: IngredientRow) -> Result<Self, Self::Error> {
        Ok(Ingredient::new(r.name, r.amount, r.unit.parse::<RecipeUnit>()?)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    #[serde(flatten)]
    pub row: RecipeRow,
    pub ingredients: Vec<Ingredient>,
}
