//! Repository for the `reviews` table.
//!
//! `UNIQUE(title_id, author_id)` guarantees a single review per author per
//! title; a second insert surfaces as a unique violation (see
//! [`crate::is_unique_violation`]) and writes nothing.

use sqlx::SqlitePool;
use yamdb_core::types::DbId;

use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::NOW;

/// Select list producing a [`Review`] with the author's username.
const SELECT_REVIEW: &str = "\
    SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date \
    FROM reviews r \
    JOIN users u ON u.id = r.author_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review for `title_id` written by `author_id`.
    pub async fn create(
        pool: &SqlitePool,
        title_id: DbId,
        author_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO reviews (title_id, author_id, text, score) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(title_id)
        .bind(author_id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!("{SELECT_REVIEW} WHERE r.id = $1");
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(review)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a review only if it belongs to `title_id`.
    pub async fn find_for_title(
        pool: &SqlitePool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.id = $1 AND r.title_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// List all reviews of a title, oldest first.
    pub async fn list_for_title(pool: &SqlitePool, title_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.title_id = $1 ORDER BY r.id");
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .fetch_all(pool)
            .await
    }

    /// Update a review's text and/or score, refreshing `pub_date`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET \
                text = COALESCE($2, text), \
                score = COALESCE($3, score), \
                pub_date = {NOW} \
             WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.score)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a review and its comments. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Raw scores of a title's reviews, in insertion order.
    pub async fn scores_for_title(pool: &SqlitePool, title_id: DbId) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT score FROM reviews WHERE title_id = $1 ORDER BY id")
            .bind(title_id)
            .fetch_all(pool)
            .await
    }
}
