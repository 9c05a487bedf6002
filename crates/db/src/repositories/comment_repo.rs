//! Repository for the `comments` table.

use sqlx::SqlitePool;
use yamdb_core::types::DbId;

use crate::models::comment::{Comment, CreateComment, UpdateComment};
use crate::NOW;

const SELECT_COMMENT: &str = "\
    SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date \
    FROM comments c \
    JOIN users u ON u.id = c.author_id";

/// Provides CRUD operations for comments on reviews.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &SqlitePool,
        review_id: DbId,
        author_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO comments (review_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(review_id)
        .bind(author_id)
        .bind(&input.text)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!("{SELECT_COMMENT} WHERE c.id = $1");
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("{SELECT_COMMENT} WHERE c.id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a comment only if it belongs to `review_id`.
    pub async fn find_for_review(
        pool: &SqlitePool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("{SELECT_COMMENT} WHERE c.id = $1 AND c.review_id = $2");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_review(
        pool: &SqlitePool,
        review_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!("{SELECT_COMMENT} WHERE c.review_id = $1 ORDER BY c.id");
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .fetch_all(pool)
            .await
    }

    /// Update a comment's text, refreshing `pub_date`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET text = COALESCE($2, text), pub_date = {NOW} WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(&input.text)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
