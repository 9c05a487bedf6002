//! Repository for the `categories` table.

use sqlx::SqlitePool;

use crate::contains_pattern;
use crate::models::category::{Category, CategoryListParams, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug";

/// Provides create/list/delete operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// Fails with a unique violation when the slug is taken.
    pub async fn create(pool: &SqlitePool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List categories ordered by name, optionally filtered by a literal name
    /// substring. Matching ignores case for ASCII letters only.
    pub async fn list(
        pool: &SqlitePool,
        params: &CategoryListParams,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE ($1 IS NULL OR name LIKE $1 ESCAPE '\\') \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .fetch_all(pool)
            .await
    }

    /// Delete a category by slug. Titles in the category keep existing with
    /// no category. Returns `true` if a row was removed.
    pub async fn delete_by_slug(pool: &SqlitePool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
