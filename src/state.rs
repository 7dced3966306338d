use crate::auth::repo::{PgUserDirectory, UserDirectory};
use crate::calendar::repo::PgMealPlanLookup;
use crate::config::AppConfig;
use crate::shopping::{repo::PgShoppingListStore, services::ShoppingListService};
use anyhow::Context;
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserDirectory>,
    pub shopping: ShoppingListService,
}

impl FromRef<AppState> for Arc<dyn UserDirectory> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let shopping = ShoppingListService::new(
            Arc::new(PgMealPlanLookup::new(db.clone())),
            Arc::new(PgShoppingListStore::new(db.clone())),
        );
        Self {
            users: Arc::new(PgUserDirectory::new(db.clone())),
            db,
            config,
            shopping,
        }
    }

    /// State for tests: in-memory collaborators and a pool that never
    /// connects unless a query runs.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::shopping::memory::{MemoryMealPlans, MemoryShoppingStore};

        Self::fake_with(
            Arc::new(MemoryMealPlans::default()),
            Arc::new(MemoryShoppingStore::default()),
        )
    }

    #[cfg(test)]
    pub fn fake_with(
        meal_plans: Arc<dyn crate::shopping::store::MealPlanLookup>,
        store: Arc<dyn crate::shopping::store::ShoppingListStore>,
    ) -> Self {
        let config = Arc::new(AppConfig::test());
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool ok");
        Self {
            db,
            config,
            users: Arc::new(crate::auth::memory::MemoryUsers::default()),
            shopping: ShoppingListService::new(meal_plans, store),
        }
    }

    #[cfg(test)]
    pub fn with_users(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = users;
        self
    }
}
