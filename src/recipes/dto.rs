use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Ingredient;
use crate::{error::AppError, units::RecipeUnit};

#[derive(Debug, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: Vec<IngredientInput>,
}

/// Checked form of [`CreateRecipeRequest`].
#[derive(Debug)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl TryFrom<CreateRecipeRequest> for NewRecipe {
    type Error = AppError;

    fn try_from(req: CreateRecipeRequest) -> Result<Self, Self::Error> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        if req.ingredients.is_empty() {
            return Err(AppError::Validation("recipe needs at least one ingredient".into()));
        }
        let ingredients = req
            .ingredients
            .into_iter()
            .map(|i| {
                let unit: RecipeUnit = i
                    .unit
                    .parse()
                    .map_err(|e: crate::units::UnknownUnit| AppError::Validation(e.to_string()))?;
                Ingredient::new(i.name.trim(), i.amount, unit)
                    .map_err(|e| AppError::Validation(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title,
            description: req.description.filter(|d| !d.trim().is_empty()),
            ingredients,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    pub const MAX_LIMIT: i64 = 100;

    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, Self::MAX_LIMIT), self.offset.max(0))
    }
}
