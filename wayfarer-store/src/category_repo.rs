use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfarer_core::repository::{CategoryRepository, StoreResult};
use wayfarer_core::TourCategory;

use crate::db_error;

pub struct StoreCategoryRepository {
    pool: PgPool,
}

impl StoreCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    category: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for TourCategory {
    fn from(row: CategoryRow) -> Self {
        TourCategory {
            id: row.id,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for StoreCategoryRepository {
    async fn list_categories(&self) -> StoreResult<Vec<TourCategory>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, category, description, created_at, updated_at FROM tour_categories ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(TourCategory::from).collect())
    }

    async fn get_category(&self, id: Uuid) -> StoreResult<Option<TourCategory>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, category, description, created_at, updated_at FROM tour_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(TourCategory::from))
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<TourCategory>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, category, description, created_at, updated_at FROM tour_categories WHERE category = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(TourCategory::from))
    }

    async fn create_category(&self, category: &TourCategory) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tour_categories (id, category, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(&category.category)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn update_category(&self, category: &TourCategory) -> StoreResult<()> {
        sqlx::query(
            "UPDATE tour_categories SET category = $2, description = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.category)
        .bind(&category.description)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tour_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
