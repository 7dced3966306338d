//! In-process stand-ins for the Postgres collaborators, used by tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::{
    repo_types::{FlagsPatch, NewShoppingItem, ShoppingItem},
    store::{MealPlanLookup, ShoppingListStore},
};
use crate::calendar::repo_types::PlannedMeal;

fn stored_item(item: NewShoppingItem, user_id: Uuid) -> ShoppingItem {
    ShoppingItem {
        id: Uuid::new_v4(),
        user_id,
        name: item.name,
        amount: item.amount,
        unit: item.unit,
        purchased: item.purchased,
        have_at_home: item.have_at_home,
    }
}

#[derive(Default)]
pub struct MemoryMealPlans {
    meals: Mutex<HashMap<Uuid, Vec<PlannedMeal>>>,
    pub fail: AtomicBool,
}

impl MemoryMealPlans {
    pub fn plan(&self, user_id: Uuid, meal: PlannedMeal) {
        self.meals.lock().unwrap().entry(user_id).or_default().push(meal);
    }

    pub fn clear(&self, user_id: Uuid) {
        self.meals.lock().unwrap().remove(&user_id);
    }
}

#[async_trait]
impl MealPlanLookup for MemoryMealPlans {
    async fn find_planned_meals(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedMeal>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("meal plan lookup offline");
        }
        let meals = self.meals.lock().unwrap();
        Ok(meals
            .get(&user_id)
            .map(|all| {
                all.iter()
                    .filter(|m| start <= m.date && m.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Replacement swaps the list in one step, like a committed transaction.
#[derive(Default)]
pub struct MemoryShoppingStore {
    items: Mutex<HashMap<Uuid, Vec<ShoppingItem>>>,
    pub fail_writes: AtomicBool,
}

impl MemoryShoppingStore {
    pub fn seed(&self, user_id: Uuid, item: NewShoppingItem) -> ShoppingItem {
        let item = stored_item(item, user_id);
        self.items
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(item.clone());
        item
    }

    pub fn snapshot(&self, user_id: Uuid) -> Vec<ShoppingItem> {
        self.items
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("shopping store rejected write");
        }
        Ok(())
    }
}

#[async_trait]
impl ShoppingListStore for MemoryShoppingStore {
    async fn find_all(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
        Ok(self.snapshot(user_id))
    }

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        self.check_writable()?;
        let removed = self.items.lock().unwrap().remove(&user_id);
        Ok(removed.map(|v| v.len() as u64).unwrap_or(0))
    }

    async fn insert_many(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        self.check_writable()?;
        let stored: Vec<_> = items
            .into_iter()
            .map(|i| stored_item(i, user_id))
            .collect();
        self.items
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn replace_all(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        self.check_writable()?;
        let stored: Vec<_> = items
            .into_iter()
            .map(|i| stored_item(i, user_id))
            .collect();
        self.items.lock().unwrap().insert(user_id, stored.clone());
        Ok(stored)
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        patch: FlagsPatch,
    ) -> anyhow::Result<Option<ShoppingItem>> {
        self.check_writable()?;
        let mut all = self.items.lock().unwrap();
        let Some(item) = all
            .get_mut(&user_id)
            .and_then(|list| list.iter_mut().find(|i| i.id == item_id))
        else {
            return Ok(None);
        };
        if let Some(v) = patch.purchased {
            item.purchased = v;
        }
        if let Some(v) = patch.have_at_home {
            item.have_at_home = v;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_one(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        self.check_writable()?;
        let mut all = self.items.lock().unwrap();
        let Some(list) = all.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|i| i.id != item_id);
        Ok(list.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ShoppingUnit;

    fn item(name: &str) -> NewShoppingItem {
        NewShoppingItem {
            name: name.into(),
            amount: 1.0,
            unit: ShoppingUnit::Szt,
            purchased: false,
            have_at_home: false,
        }
    }

    #[tokio::test]
    async fn default_replace_deletes_then_inserts() {
        struct Plain(MemoryShoppingStore);

        #[async_trait]
        impl ShoppingListStore for Plain {
            async fn find_all(&self, u: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
                self.0.find_all(u).await
            }
            async fn delete_all(&self, u: Uuid) -> anyhow::Result<u64> {
                self.0.delete_all(u).await
            }
            async fn insert_many(
                &self,
                u: Uuid,
                items: Vec<NewShoppingItem>,
            ) -> anyhow::Result<Vec<ShoppingItem>> {
                self.0.insert_many(u, items).await
            }
            async fn update_flags(
                &self,
                u: Uuid,
                id: Uuid,
                p: FlagsPatch,
            ) -> anyhow::Result<Option<ShoppingItem>> {
                self.0.update_flags(u, id, p).await
            }
            async fn delete_one(&self, u: Uuid, id: Uuid) -> anyhow::Result<bool> {
                self.0.delete_one(u, id).await
            }
        }

        let store = Plain(MemoryShoppingStore::default());
        let user = Uuid::new_v4();
        store.0.seed(user, item("old"));

        let saved = store.replace_all(user, vec![item("new")]).await.unwrap();
        assert_eq!(saved.len(), 1);
        let names: Vec<_> = store.0.snapshot(user).into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["new"]);

        let saved = store.replace_all(user, Vec::new()).await.unwrap();
        assert!(saved.is_empty());
        assert!(store.0.snapshot(user).is_empty());
    }

    #[tokio::test]
    async fn item_operations_are_scoped_to_owner() {
        let store = MemoryShoppingStore::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let stored = store.seed(owner, item("chleb"));

        let patch = FlagsPatch {
            purchased: Some(true),
            have_at_home: None,
        };
        assert!(store.update_flags(stranger, stored.id, patch).await.unwrap().is_none());
        assert!(!store.delete_one(stranger, stored.id).await.unwrap());

        let updated = store.update_flags(owner, stored.id, patch).await.unwrap().unwrap();
        assert!(updated.purchased);
        assert!(store.delete_one(owner, stored.id).await.unwrap());
        assert!(store.snapshot(owner).is_empty());
    }
}
