use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::{dto::UpdateItemRequest, repo_types::ShoppingItem};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shopping", get(list_items))
        .route("/shopping/generate", post(generate))
        .route("/shopping/:id", patch(update_item).delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ShoppingItem>>> {
    Ok(Json(state.shopping.list(user_id).await?))
}

/// POST /shopping/generate: rebuild the list from this week's plan.
#[instrument(skip(state))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ShoppingItem>>> {
    let items = state
        .shopping
        .generate(user_id, OffsetDateTime::now_utc())
        .await?;
    Ok(Json(items))
}

#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> AppResult<Json<ShoppingItem>> {
    let item = state
        .shopping
        .update_flags(user_id, id, body.into())
        .await?;
    Ok(Json(item))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.shopping.delete_item(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
