use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    aggregate::aggregate,
    locks::UserLocks,
    repo_types::{FlagsPatch, ShoppingItem},
    store::{MealPlanLookup, ShoppingListStore},
    window::PlanWindow,
};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ShoppingListService {
    meal_plans: Arc<dyn MealPlanLookup>,
    store: Arc<dyn ShoppingListStore>,
    locks: Arc<UserLocks>,
}

impl ShoppingListService {
    pub fn new(meal_plans: Arc<dyn MealPlanLookup>, store: Arc<dyn ShoppingListStore>) -> Self {
        Self {
            meal_plans,
            store,
            locks: Arc::new(UserLocks::default()),
        }
    }

    /// Rebuilds the user's shopping list from meals planned between `now`'s
    /// day and the coming Sunday, replacing whatever was stored before.
    #[instrument(skip(self))]
    pub async fn generate(&self, user_id: Uuid, now: OffsetDateTime) -> AppResult<Vec<ShoppingItem>> {
        let _guard = self.locks.lock(user_id).await;
        let window = PlanWindow::containing(now);

        let meals = self
            .meal_plans
            .find_planned_meals(user_id, window.start, window.end)
            .await
            .context("load planned meals")?;
        debug_assert!(meals.iter().all(|m| window.contains(m.date)));
        let existing = self
            .store
            .find_all(user_id)
            .await
            .context("load shopping list")?;

        let items = aggregate(&meals, &existing);
        let saved = self
            .store
            .replace_all(user_id, items)
            .await
            .context("replace shopping list")?;

        info!(
            start = %window.start,
            end = %window.end,
            days = window.days(),
            meals = meals.len(),
            previous = existing.len(),
            items = saved.len(),
            "shopping list generated"
        );
        Ok(saved)
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<ShoppingItem>> {
        Ok(self.store.find_all(user_id).await.context("load shopping list")?)
    }

    pub async fn update_flags(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        patch: FlagsPatch,
    ) -> AppResult<ShoppingItem> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "nothing to update: send purchased and/or have_at_home".into(),
            ));
        }
        self.store
            .update_flags(user_id, item_id, patch)
            .await
            .context("update shopping item")?
            .ok_or(AppError::NotFound("shopping item"))
    }

    pub async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let removed = self
            .store
            .delete_one(user_id, item_id)
            .await
            .context("delete shopping item")?;
        if removed {
            Ok(())
        } else {
            Err(AppError::NotFound("shopping item"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        shopping::{
            aggregate::tests::{meal, meal_on},
            memory::{MemoryMealPlans, MemoryShoppingStore},
            repo_types::NewShoppingItem,
        },
        units::{RecipeUnit, ShoppingUnit},
    };
    use time::macros::{date, datetime};

    const WEDNESDAY: OffsetDateTime = datetime!(2024-05-15 09:00 UTC);

    struct Fixture {
        plans: Arc<MemoryMealPlans>,
        store: Arc<MemoryShoppingStore>,
        service: ShoppingListService,
        user: Uuid,
    }

    fn fixture() -> Fixture {
        let plans = Arc::new(MemoryMealPlans::default());
        let store = Arc::new(MemoryShoppingStore::default());
        let service = ShoppingListService::new(plans.clone(), store.clone());
        Fixture {
            plans,
            store,
            service,
            user: Uuid::new_v4(),
        }
    }

    fn stored(name: &str, unit: ShoppingUnit, purchased: bool) -> NewShoppingItem {
        NewShoppingItem {
            name: name.into(),
            amount: 2.0,
            unit,
            purchased,
            have_at_home: false,
        }
    }

    fn summary(items: &[ShoppingItem]) -> Vec<(String, f64, ShoppingUnit, bool, bool)> {
        items
            .iter()
            .map(|i| (i.name.clone(), i.amount, i.unit, i.purchased, i.have_at_home))
            .collect()
    }

    #[tokio::test]
    async fn regenerating_an_unchanged_plan_is_stable() {
        let f = fixture();
        f.plans.plan(
            f.user,
            meal(&[("cukier", 100.0, RecipeUnit::G), ("mleko", 200.0, RecipeUnit::Ml)]),
        );

        let first = f.service.generate(f.user, WEDNESDAY).await.unwrap();
        f.service
            .update_flags(
                f.user,
                first[0].id,
                FlagsPatch {
                    purchased: Some(true),
                    have_at_home: None,
                },
            )
            .await
            .unwrap();
        let flagged = f.service.list(f.user).await.unwrap();

        let second = f.service.generate(f.user, WEDNESDAY).await.unwrap();
        assert_eq!(summary(&flagged), summary(&second));
        assert!(second[0].purchased);
    }

    #[tokio::test]
    async fn purchased_flag_survives_regeneration() {
        let f = fixture();
        f.store.seed(f.user, stored("cukier", ShoppingUnit::G, true));
        f.plans.plan(f.user, meal(&[("cukier", 250.0, RecipeUnit::G)]));

        let items = f.service.generate(f.user, WEDNESDAY).await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].purchased);
        assert_eq!(items[0].amount, 250.0);
        assert_eq!(items[0].user_id, f.user);
    }

    #[tokio::test]
    async fn empty_plan_clears_the_list() {
        let f = fixture();
        f.store.seed(f.user, stored("chleb", ShoppingUnit::Szt, false));
        f.store.seed(f.user, stored("masło", ShoppingUnit::G, true));

        let items = f.service.generate(f.user, WEDNESDAY).await.unwrap();
        assert!(items.is_empty());
        assert!(f.store.snapshot(f.user).is_empty());
    }

    #[tokio::test]
    async fn meals_after_sunday_are_ignored() {
        let f = fixture();
        f.plans
            .plan(f.user, meal_on(date!(2024 - 05 - 19), &[("jabłka", 3.0, RecipeUnit::Szt)]));
        f.plans
            .plan(f.user, meal_on(date!(2024 - 05 - 20), &[("gruszki", 2.0, RecipeUnit::Szt)]));
        f.plans
            .plan(f.user, meal_on(date!(2024 - 05 - 14), &[("śliwki", 2.0, RecipeUnit::Szt)]));

        let items = f.service.generate(f.user, WEDNESDAY).await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["jabłka"]);
    }

    #[tokio::test]
    async fn users_do_not_see_each_other() {
        let f = fixture();
        let other = Uuid::new_v4();
        f.store.seed(other, stored("kawa", ShoppingUnit::G, true));
        f.plans.plan(f.user, meal(&[("herbata", 1.0, RecipeUnit::Szt)]));

        f.service.generate(f.user, WEDNESDAY).await.unwrap();
        assert_eq!(f.store.snapshot(other).len(), 1);
        assert_eq!(f.store.snapshot(f.user)[0].name, "herbata");
    }

    #[tokio::test]
    async fn failed_lookup_keeps_previous_list() {
        let f = fixture();
        f.store.seed(f.user, stored("chleb", ShoppingUnit::Szt, true));
        f.plans.fail.store(true, Ordering::SeqCst);

        let err = f.service.generate(f.user, WEDNESDAY).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(f.store.snapshot(f.user).len(), 1);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_list() {
        let f = fixture();
        f.store.seed(f.user, stored("chleb", ShoppingUnit::Szt, true));
        f.plans.plan(f.user, meal(&[("mąka", 500.0, RecipeUnit::G)]));
        f.store.fail_writes.store(true, Ordering::SeqCst);

        let err = f.service.generate(f.user, WEDNESDAY).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        let left = f.store.snapshot(f.user);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "chleb");
    }

    #[tokio::test]
    async fn concurrent_generates_leave_one_list() {
        let f = fixture();
        f.store.seed(f.user, stored("ryż", ShoppingUnit::G, true));
        f.plans.plan(f.user, meal(&[("ryż", 100.0, RecipeUnit::G)]));

        let (a, b) = tokio::join!(
            f.service.generate(f.user, WEDNESDAY),
            f.service.generate(f.user, WEDNESDAY)
        );
        assert!(a.unwrap()[0].purchased);
        assert!(b.unwrap()[0].purchased);
        let left = f.store.snapshot(f.user);
        assert_eq!(left.len(), 1);
        assert!(left[0].purchased);
    }

    #[tokio::test]
    async fn item_operations_report_missing_items() {
        let f = fixture();
        let patch = FlagsPatch {
            purchased: None,
            have_at_home: Some(true),
        };
        let err = f
            .service
            .update_flags(f.user, Uuid::new_v4(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = f.service.delete_item(f.user, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let f = fixture();
        let item = f.store.seed(f.user, stored("sól", ShoppingUnit::G, false));
        let err = f
            .service
            .update_flags(f.user, item.id, FlagsPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn removing_a_meal_then_regenerating_drops_its_items() {
        let f = fixture();
        f.plans.plan(f.user, meal(&[("makaron", 250.0, RecipeUnit::G)]));
        assert_eq!(f.service.generate(f.user, WEDNESDAY).await.unwrap().len(), 1);

        f.plans.clear(f.user);
        assert!(f.service.generate(f.user, WEDNESDAY).await.unwrap().is_empty());
    }
}
