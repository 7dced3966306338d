use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CalendarEntry, CreateEntryRequest, RangeQuery},
    repo,
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    recipes,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(list_entries).post(create_entry))
        .route("/calendar/:id", delete(delete_entry))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<CalendarEntry>>> {
    range.check()?;
    let entries = repo::list_entries(&state.db, user_id, range.from, range.to)
        .await?
        .into_iter()
        .map(CalendarEntry::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<CalendarEntry>)> {
    if !recipes::repo::exists(&state.db, user_id, body.recipe_id).await? {
        return Err(AppError::NotFound("recipe"));
    }
    let row = repo::insert_entry(&state.db, user_id, body.date, body.slot, body.recipe_id).await?;
    let entry = CalendarEntry::try_from(row)?;
    info!(%user_id, entry_id = %entry.id, date = %entry.date, slot = %entry.slot, "meal planned");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_entry(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("calendar entry"));
    }
    Ok(StatusCode::NO_CONTENT)
}
