use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Category;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Category>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create(&self, title: &str) -> anyhow::Result<Category>;
    /// Returns `None` when no row with `id` was updated.
    async fn update(&self, id: Uuid, title: &str) -> anyhow::Result<Option<Category>>;
    /// Returns `false` when no row with `id` existed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgCategoryStore {
    db: PgPool,
}

impl PgCategoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title
            FROM categories
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"SELECT id, title FROM categories WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find category")?;
        Ok(row)
    }

    async fn create(&self, title: &str) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (title)
            VALUES ($1)
            RETURNING id, title
            "#,
        )
        .bind(title)
        .fetch_one(&self.db)
        .await
        .context("insert category")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, title: &str) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET title = $2
             WHERE id = $1
            RETURNING id, title
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.db)
        .await
        .context("update category")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete category")?;
        Ok(result.rows_affected() > 0)
    }
}
