use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{
    CalendarEntryRow, MealSlot, PlannedIngredientRow, PlannedMeal, PlannedRecipe,
};
use crate::shopping::store::MealPlanLookup;

const ENTRY_COLUMNS: &str = r#"
    pm.id, pm.recipe_id, r.title AS recipe_title, pm.date, pm.slot, pm.created_at
"#;

// breakfast first, snacks last
const SLOT_ORDER: &str = r#"
    CASE pm.slot WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 WHEN 'dinner' THEN 2 ELSE 3 END
"#;

pub async fn insert_entry(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    slot: MealSlot,
    recipe_id: Uuid,
) -> anyhow::Result<CalendarEntryRow> {
    let sql = format!(
        r#"
        WITH inserted AS (
            INSERT INTO planned_meals (id, user_id, recipe_id, date, slot)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        )
        SELECT {ENTRY_COLUMNS}
          FROM inserted pm
          JOIN recipes r ON r.id = pm.recipe_id
        "#
    );
    let row = sqlx::query_as::<_, CalendarEntryRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(recipe_id)
        .bind(date)
        .bind(slot.as_str())
        .fetch_one(db)
        .await
        .context("insert planned meal")?;
    Ok(row)
}

pub async fn list_entries(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<CalendarEntryRow>> {
    let sql = format!(
        r#"
        SELECT {ENTRY_COLUMNS}
          FROM planned_meals pm
          JOIN recipes r ON r.id = pm.recipe_id
         WHERE pm.user_id = $1 AND pm.date BETWEEN $2 AND $3
         ORDER BY pm.date, {SLOT_ORDER}, pm.created_at
        "#
    );
    let rows = sqlx::query_as::<_, CalendarEntryRow>(&sql)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await
        .context("list planned meals")?;
    Ok(rows)
}

pub async fn delete_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> anyhow::Result<bool> {
    let done = sqlx::query("DELETE FROM planned_meals WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete planned meal")?;
    Ok(done.rows_affected() > 0)
}

/// Folds join rows (one per ingredient, ordered by meal) into meals.
pub fn group_planned_rows(rows: Vec<PlannedIngredientRow>) -> anyhow::Result<Vec<PlannedMeal>> {
    let mut meals: Vec<PlannedMeal> = Vec::new();
    for row in rows {
        let ingredient = row.ingredient()?;
        let same_meal = meals.last().is_some_and(|m| m.id == row.meal_id);
        if !same_meal {
            meals.push(PlannedMeal {
                id: row.meal_id,
                date: row.date,
                slot: row.slot.parse::<MealSlot>()?,
                recipe: PlannedRecipe {
                    id: row.recipe_id,
                    title: row.title,
                    ingredients: Vec::new(),
                },
            });
        }
        if let (Some(ingredient), Some(meal)) = (ingredient, meals.last_mut()) {
            meal.recipe.ingredients.push(ingredient);
        }
    }
    Ok(meals)
}

#[derive(Clone)]
pub struct PgMealPlanLookup {
    db: PgPool,
}

impl PgMealPlanLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealPlanLookup for PgMealPlanLookup {
    async fn find_planned_meals(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedMeal>> {
        let sql = format!(
            r#"
            SELECT pm.id AS meal_id, pm.date, pm.slot, r.id AS recipe_id, r.title,
                   ri.name, ri.amount, ri.unit
              FROM planned_meals pm
              JOIN recipes r ON r.id = pm.recipe_id
              LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
             WHERE pm.user_id = $1 AND pm.date BETWEEN $2 AND $3
             ORDER BY pm.date, {SLOT_ORDER}, pm.created_at, pm.id, ri.position
            "#
        );
        let rows = sqlx::query_as::<_, PlannedIngredientRow>(&sql)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await
            .context("load planned meal ingredients")?;
        group_planned_rows(rows)
    }
}
