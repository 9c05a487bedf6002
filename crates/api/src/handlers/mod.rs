//! Per-entity application operations.
//!
//! Each handler validates its input, checks the caller against the role
//! table in [`yamdb_core::permissions`], then calls the repository. Path
//! parents (a title for reviews, a title and review for comments) are
//! resolved before any write so a mismatched chain is reported as not found.

pub mod auth;
pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;

use yamdb_core::error::CoreError;

use crate::error::AppError;

/// Turn a unique-constraint violation into a [`CoreError::Conflict`] with a
/// domain message; pass every other database error through.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if yamdb_db::is_unique_violation(&err) {
        AppError::Core(CoreError::Conflict(message()))
    } else {
        AppError::Database(err)
    }
}
