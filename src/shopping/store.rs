use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::{
    calendar::repo_types::PlannedMeal,
    shopping::repo_types::{FlagsPatch, NewShoppingItem, ShoppingItem},
};

/// Source of a user's planned meals with recipe ingredients resolved.
#[async_trait]
pub trait MealPlanLookup: Send + Sync {
    /// Meals dated `start..=end`, in plan order.
    async fn find_planned_meals(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedMeal>>;
}

/// Per-user shopping list persistence.
#[async_trait]
pub trait ShoppingListStore: Send + Sync {
    async fn find_all(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>>;

    /// Returns the number of removed items.
    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64>;

    async fn insert_many(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>>;

    /// Swaps the user's whole list for `items`.
    ///
    /// The default runs `delete_all` then `insert_many` and is not atomic:
    /// a reader may briefly see an empty list, and a failed insert leaves it
    /// empty. Stores with transactions should override this.
    async fn replace_all(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        self.delete_all(user_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        self.insert_many(user_id, items).await
    }

    /// `None` when the item does not exist or belongs to someone else.
    async fn update_flags(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        patch: FlagsPatch,
    ) -> anyhow::Result<Option<ShoppingItem>>;

    async fn delete_one(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool>;
}
