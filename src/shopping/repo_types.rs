use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::units::ShoppingUnit;

/// Persisted shopping list entry, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub unit: ShoppingUnit,
    pub purchased: bool,
    pub have_at_home: bool,
}

/// Entry produced by aggregation, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShoppingItem {
    pub name: String,
    pub amount: f64,
    pub unit: ShoppingUnit,
    pub purchased: bool,
    pub have_at_home: bool,
}

/// Partial update of the per-item flags; `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagsPatch {
    pub purchased: Option<bool>,
    pub have_at_home: Option<bool>,
}

impl FlagsPatch {
    pub fn is_empty(&self) -> bool {
        self.purchased.is_none() && self.have_at_home.is_none()
    }
}

#[derive(Debug, FromRow)]
pub struct ShoppingItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub purchased: bool,
    pub have_at_home: bool,
}

impl TryFrom<ShoppingItemRow> for ShoppingItem {
    type Error = anyhow::Error;

    fn try_from(r: ShoppingItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            unit: r.unit.parse::<ShoppingUnit>()?,
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            amount: r.amount,
            purchased: r.purchased,
            have_at_home: r.have_at_home,
        })
    }
}
