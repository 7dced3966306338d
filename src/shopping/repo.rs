use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{
    repo_types::{FlagsPatch, NewShoppingItem, ShoppingItem, ShoppingItemRow},
    store::ShoppingListStore,
};

#[derive(Clone)]
pub struct PgShoppingListStore {
    db: PgPool,
}

impl PgShoppingListStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn delete_items(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM shopping_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .context("delete shopping items")?;
    Ok(done.rows_affected())
}

async fn insert_items(
    conn: &mut PgConnection,
    user_id: Uuid,
    items: Vec<NewShoppingItem>,
) -> anyhow::Result<Vec<ShoppingItem>> {
    // continue after rows already on the list
    let (offset,): (i32,) = sqlx::query_as(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM shopping_items WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await
    .context("next shopping position")?;

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let row = sqlx::query_as::<_, ShoppingItemRow>(
            r#"
            INSERT INTO shopping_items (id, user_id, position, name, amount, unit, purchased, have_at_home)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, name, amount, unit, purchased, have_at_home
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(offset + i as i32)
        .bind(&item.name)
        .bind(item.amount)
        .bind(item.unit.as_str())
        .bind(item.purchased)
        .bind(item.have_at_home)
        .fetch_one(&mut *conn)
        .await
        .with_context(|| format!("insert shopping item {}", item.name))?;
        out.push(ShoppingItem::try_from(row)?);
    }
    Ok(out)
}

#[async_trait]
impl ShoppingListStore for PgShoppingListStore {
    async fn find_all(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
        let rows = sqlx::query_as::<_, ShoppingItemRow>(
            r#"
            SELECT id, user_id, name, amount, unit, purchased, have_at_home
              FROM shopping_items
             WHERE user_id = $1
             ORDER BY position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list shopping items")?;
        rows.into_iter().map(ShoppingItem::try_from).collect()
    }

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut conn = self.db.acquire().await.context("acquire connection")?;
        delete_items(&mut conn, user_id).await
    }

    async fn insert_many(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = self.db.begin().await.context("begin tx")?;
        let saved = insert_items(&mut tx, user_id, items).await?;
        tx.commit().await.context("commit tx")?;
        Ok(saved)
    }

    async fn replace_all(
        &self,
        user_id: Uuid,
        items: Vec<NewShoppingItem>,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let removed = delete_items(&mut tx, user_id).await?;
        let saved = if items.is_empty() {
            Vec::new()
        } else {
            insert_items(&mut tx, user_id, items).await?
        };
        tx.commit().await.context("commit tx")?;
        tracing::debug!(%user_id, removed, inserted = saved.len(), "shopping list replaced");
        Ok(saved)
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        patch: FlagsPatch,
    ) -> anyhow::Result<Option<ShoppingItem>> {
        let row = sqlx::query_as::<_, ShoppingItemRow>(
            r#"
            UPDATE shopping_items
               SET purchased = COALESCE($3, purchased),
                   have_at_home = COALESCE($4, have_at_home)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, amount, unit, purchased, have_at_home
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(patch.purchased)
        .bind(patch.have_at_home)
        .fetch_optional(&self.db)
        .await
        .context("update shopping item")?;
        row.map(ShoppingItem::try_from).transpose()
    }

    async fn delete_one(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let done = sqlx::query("DELETE FROM shopping_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete shopping item")?;
        Ok(done.rows_affected() > 0)
    }
}
