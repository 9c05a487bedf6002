//! Handlers for reviews nested under a title.
//!
//! A title accepts at most one review per author. The storage constraint
//! decides races; the losing insert is reported as a conflict and writes
//! nothing.

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_score, validate_text};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::conflict_on_unique;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

/// Fail with `NotFound` unless the title exists.
pub(crate) async fn resolve_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found("Title", title_id)))
    }
}

/// Load a review that belongs to `title_id`. A review of another title is
/// reported as not found.
pub(crate) async fn resolve_review(pool: &DbPool, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    resolve_title(pool, title_id).await?;
    ReviewRepo::find_for_title(pool, title_id, review_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Review", review_id)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn list_reviews(state: &AppState, title_id: DbId) -> AppResult<Vec<Review>> {
    resolve_title(&state.pool, title_id).await?;
    Ok(ReviewRepo::list_for_title(&state.pool, title_id).await?)
}

pub async fn get_review(state: &AppState, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    resolve_review(&state.pool, title_id, review_id).await
}

/// Submit the caller's review of a title.
///
/// Fails with `Validation` for a score outside 1..=10, with `Conflict`
/// when the caller already reviewed this title, and with `NotFound` when the
/// title or the caller's account is gone.
pub async fn create_review(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    input: &CreateReview,
) -> AppResult<Review> {
    ensure(principal, Action::Create, Resource::Reviews)?;
    validate_text("text", &input.text)?;
    validate_score(input.score)?;
    resolve_title(&state.pool, title_id).await?;

    let review = match ReviewRepo::create(&state.pool, title_id, principal.user_id, input).await {
        Ok(review) => review,
        Err(e) if yamdb_db::is_foreign_key_violation(&e) => {
            // Either the title went away after it was resolved, or the author did.
            resolve_title(&state.pool, title_id).await?;
            return Err(AppError::Core(CoreError::not_found("User", principal.user_id)));
        }
        Err(e) => {
            return Err(conflict_on_unique(e, || {
                "You have already reviewed this title".to_string()
            }))
        }
    };

    tracing::info!(
        user_id = principal.user_id,
        title_id,
        review_id = review.id,
        score = review.score,
        "Review created"
    );

    Ok(review)
}

/// Edit a review. Allowed for its author, moderators and admins.
pub async fn update_review(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    review_id: DbId,
    input: &UpdateReview,
) -> AppResult<Review> {
    let existing = resolve_review(&state.pool, title_id, review_id).await?;
    ensure(
        principal,
        Action::Update,
        Resource::Review {
            author_id: existing.author_id,
        },
    )?;

    if let Some(ref text) = input.text {
        validate_text("text", text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let review = ReviewRepo::update(&state.pool, review_id, input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Review", review_id)))?;

    tracing::info!(
        user_id = principal.user_id,
        title_id,
        review_id,
        "Review updated"
    );

    Ok(review)
}

/// Delete a review and its comments. Allowed for its author, moderators and
/// admins.
pub async fn delete_review(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<()> {
    let existing = resolve_review(&state.pool, title_id, review_id).await?;
    ensure(
        principal,
        Action::Delete,
        Resource::Review {
            author_id: existing.author_id,
        },
    )?;

    if !ReviewRepo::delete(&state.pool, review_id).await? {
        return Err(AppError::Core(CoreError::not_found("Review", review_id)));
    }

    tracing::info!(
        user_id = principal.user_id,
        title_id,
        review_id,
        "Review deleted"
    );

    Ok(())
}
