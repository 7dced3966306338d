use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateRecipeRequest, NewRecipe, Pagination, RecipeListItem},
    repo,
    repo_types::Recipe,
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/:id", get(get_recipe).delete(delete_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<RecipeListItem>>> {
    let (limit, offset) = p.clamped();
    let items = repo::list_by_user(&state.db, user_id, limit, offset)
        .await?
        .into_iter()
        .map(|r| RecipeListItem {
            id: r.id,
            title: r.title,
            description: r.description,
            created_at: r.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<Recipe>)> {
    let recipe = NewRecipe::try_from(body)?;
    let saved = repo::create(&state.db, user_id, recipe).await?;
    info!(%user_id, recipe_id = %saved.row.id, ingredients = saved.ingredients.len(), "recipe created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/recipes/{}", saved.row.id)) {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Recipe>> {
    repo::get(&state.db, user_id, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("recipe"))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("recipe"));
    }
    info!(%user_id, recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
