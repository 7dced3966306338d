use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::NewRecipe,
    repo_types::{Ingredient, IngredientRow, Recipe, RecipeRow},
};

pub async fn create(db: &PgPool, user_id: Uuid, recipe: NewRecipe) -> anyhow::Result<Recipe> {
    let mut tx = db.begin().await.context("begin tx")?;

    let row = sqlx::query_as::<_, RecipeRow>(
        r#"
        INSERT INTO recipes (id, user_id, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, description, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&recipe.title)
    .bind(&recipe.description)
    .fetch_one(&mut *tx)
    .await
    .context("insert recipe")?;

    for (position, ingredient) in recipe.ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, amount, unit)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(row.id)
        .bind(position as i32)
        .bind(ingredient.name())
        .bind(ingredient.amount())
        .bind(ingredient.unit().as_str())
        .execute(&mut *tx)
        .await
        .context("insert recipe ingredient")?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(Recipe {
        row,
        ingredients: recipe.ingredients,
    })
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<RecipeRow>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, user_id, title, description, created_at
          FROM recipes
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list recipes")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let Some(row) = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, user_id, title, description, created_at
          FROM recipes
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get recipe")?
    else {
        return Ok(None);
    };

    let ingredients = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT name, amount, unit
          FROM recipe_ingredients
         WHERE recipe_id = $1
         ORDER BY position ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list recipe ingredients")?
    .into_iter()
    .map(Ingredient::try_from)
    .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Some(Recipe { row, ingredients }))
}

pub async fn exists(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let (found,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM recipes WHERE id = $1 AND user_id = $2)")
            .bind(recipe_id)
            .bind(user_id)
            .fetch_one(db)
            .await
            .context("check recipe")?;
    Ok(found)
}

/// Planned meals using the recipe go with it.
pub async fn delete(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let done = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
        .bind(recipe_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete recipe")?;
    Ok(done.rows_affected() > 0)
}
