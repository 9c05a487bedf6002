//! Repository for the `titles` and `title_genres` tables.
//!
//! Every read computes the title's average review score in the same query
//! (`AVG(score)` subquery), so ratings always reflect the current reviews.

use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Transaction};
use yamdb_core::rating;
use yamdb_core::types::DbId;

use crate::models::genre::Genre;
use crate::models::title::{CreateTitle, TitleDetail, TitleFilter, TitleRow, UpdateTitle};
use crate::NOW;

/// Select list producing a [`TitleRow`]; callers append `WHERE` / `ORDER BY`.
const SELECT_ROW: &str = "\
    SELECT t.id, t.name, t.year, t.description, t.category_id, \
           c.name AS category_name, c.slug AS category_slug, \
           (SELECT AVG(r.score) FROM reviews r WHERE r.title_id = t.id) AS avg_score, \
           t.created_at, t.updated_at \
    FROM titles t \
    LEFT JOIN categories c ON c.id = t.category_id";

#[derive(FromRow)]
struct TitleGenreRow {
    title_id: DbId,
    id: DbId,
    name: String,
    slug: String,
}

/// Provides CRUD operations for titles and their genre links.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    ///
    /// `category_id` and `genre_ids` must already be resolved from the
    /// slugs in `input`.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateTitle,
        category_id: Option<DbId>,
        genre_ids: &[DbId],
    ) -> Result<TitleDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_genres_inner(&mut tx, id, genre_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a title by ID with its category, genres and current rating.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let query = format!("{SELECT_ROW} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut genres = Self::genres_for_titles(pool, &[row.id]).await?;
        let genre = genres.remove(&row.id).unwrap_or_default();
        Ok(Some(TitleDetail::from_row(row, genre)))
    }

    /// Whether a title with this ID exists.
    pub async fn exists(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles matching `filter`, ordered by ID.
    pub async fn list(pool: &SqlitePool, filter: &TitleFilter) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!(
            "{SELECT_ROW} \
             WHERE ($1 IS NULL OR c.slug = $1) \
               AND ($2 IS NULL OR EXISTS ( \
                     SELECT 1 FROM title_genres tg \
                     JOIN genres g ON g.id = tg.genre_id \
                     WHERE tg.title_id = t.id AND g.slug = $2)) \
               AND ($3 IS NULL OR t.name = $3) \
               AND ($4 IS NULL OR t.year = $4) \
             ORDER BY t.id"
        );
        let rows = sqlx::query_as::<_, TitleRow>(&query)
            .bind(filter.category.as_deref())
            .bind(filter.genre.as_deref())
            .bind(filter.name.as_deref())
            .bind(filter.year)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut genres = Self::genres_for_titles(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let genre = genres.remove(&row.id).unwrap_or_default();
                TitleDetail::from_row(row, genre)
            })
            .collect())
    }

    /// Update a title. Only non-`None` fields are applied; `genre_ids`, when
    /// given, replaces the title's genre links.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTitle,
        category_id: Option<DbId>,
        genre_ids: Option<&[DbId]>,
    ) -> Result<Option<TitleDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE titles SET \
                name = COALESCE($2, name), \
                year = COALESCE($3, year), \
                description = COALESCE($4, description), \
                category_id = COALESCE($5, category_id), \
                updated_at = {NOW} \
             WHERE id = $1 \
             RETURNING id"
        );
        let updated: Option<DbId> = sqlx::query_scalar(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(genre_ids) = genre_ids {
            Self::set_genres_inner(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete a title. Its reviews, and their comments, go with it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Current display rating of a single title: the rounded mean of its
    /// review scores, or `None` when it has no reviews.
    pub async fn rating(pool: &SqlitePool, id: DbId) -> Result<Option<f64>, sqlx::Error> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(score) FROM reviews WHERE title_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(rating::round_rating(avg))
    }

    /// Batch-fetch genres for a set of title IDs, keyed by title.
    async fn genres_for_titles(
        pool: &SqlitePool,
        title_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Genre>>, sqlx::Error> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT tg.title_id, g.id, g.name, g.slug \
             FROM title_genres tg \
             JOIN genres g ON g.id = tg.genre_id \
             WHERE tg.title_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in title_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY g.name, g.id");

        let rows = builder
            .build_query_as::<TitleGenreRow>()
            .fetch_all(pool)
            .await?;

        let mut map: HashMap<DbId, Vec<Genre>> = HashMap::new();
        for row in rows {
            map.entry(row.title_id).or_default().push(Genre {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }
        Ok(map)
    }

    /// Replace the genre links of a title within an open transaction.
    async fn set_genres_inner(
        tx: &mut Transaction<'_, Sqlite>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut **tx)
            .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT OR IGNORE INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title_id)
                .bind(genre_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}
