//! Repository for the `users` table.

use sqlx::SqlitePool;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, UserListParams};
use crate::NOW;

const COLUMNS: &str = "\
    id, username, email, role, first_name, last_name, bio, \
    confirmation_code, created_at, updated_at";

/// Provides CRUD and confirmation-code operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation when the username or email is taken.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let role = input.role.unwrap_or_default();
        let query = format!(
            "INSERT INTO users (username, email, role, first_name, last_name, bio) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(role.as_str())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by username, optionally restricted to an exact username.
    pub async fn list(pool: &SqlitePool, params: &UserListParams) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE ($1 IS NULL OR username = $1) \
             ORDER BY username"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(params.search.as_deref())
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                username = COALESCE($2, username), \
                email = COALESCE($3, email), \
                role = COALESCE($4, role), \
                first_name = COALESCE($5, first_name), \
                last_name = COALESCE($6, last_name), \
                bio = COALESCE($7, bio), \
                updated_at = {NOW} \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role.map(Role::as_str))
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a user with their reviews and comments.
    /// Returns `true` if a row was removed.
    pub async fn delete_by_username(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a freshly issued confirmation code, replacing any previous one.
    /// Returns `true` if the user exists.
    pub async fn set_confirmation_code(
        pool: &SqlitePool,
        id: DbId,
        code: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE users SET confirmation_code = $2, updated_at = {NOW} WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(code)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check and clear a confirmation code in one statement.
    ///
    /// Returns the user when `code` matched the stored code; the code is
    /// cleared so it cannot be redeemed twice. Returns `None` on a mismatch,
    /// an unknown username, or when no code is pending.
    pub async fn redeem_confirmation_code(
        pool: &SqlitePool,
        username: &str,
        code: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET confirmation_code = NULL, updated_at = {NOW} \
             WHERE username = $1 AND confirmation_code IS NOT NULL AND confirmation_code = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
