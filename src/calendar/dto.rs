use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{CalendarEntryRow, MealSlot};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub slot: MealSlot,
    pub recipe_id: Uuid,
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both ends included.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(with = "crate::dates")]
    pub from: Date,
    #[serde(with = "crate::dates")]
    pub to: Date,
}

impl RangeQuery {
    pub const MAX_DAYS: i64 = 92;

    pub fn check(&self) -> Result<(), AppError> {
        if self.from > self.to {
            return Err(AppError::Validation("`from` must not be after `to`".into()));
        }
        if (self.to - self.from).whole_days() >= Self::MAX_DAYS {
            return Err(AppError::Validation(format!(
                "range may span at most {} days",
                Self::MAX_DAYS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub id: Uuid,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub slot: MealSlot,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<CalendarEntryRow> for CalendarEntry {
    type Error = anyhow::Error;

    fn try_from(r: CalendarEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            slot: r.slot.parse::<MealSlot>()?,
            id: r.id,
            date: r.date,
            recipe_id: r.recipe_id,
            recipe_title: r.recipe_title,
            created_at: r.created_at,
        })
    }
}
