//! Repository for the `genres` table.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::contains_pattern;
use crate::models::genre::{CreateGenre, Genre, GenreListParams};

const COLUMNS: &str = "id, name, slug";

/// Provides create/list/delete operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query =
            format!("INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every genre whose slug is in `slugs`. Unknown slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(pool: &SqlitePool, slugs: &[String]) -> Result<Vec<Genre>, sqlx::Error> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM genres WHERE slug IN ("));
        let mut separated = builder.separated(", ");
        for slug in slugs {
            separated.push_bind(slug);
        }
        separated.push_unseparated(") ORDER BY name, id");

        builder.build_query_as::<Genre>().fetch_all(pool).await
    }

    pub async fn list(pool: &SqlitePool, params: &GenreListParams) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM genres \
             WHERE ($1 IS NULL OR name LIKE $1 ESCAPE '\\') \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .fetch_all(pool)
            .await
    }

    /// Delete a genre by slug, unlinking it from all titles. Returns `true`
    /// if a row was removed.
    pub async fn delete_by_slug(pool: &SqlitePool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
