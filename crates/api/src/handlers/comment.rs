//! Handlers for comments nested under a title's review.

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_text;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::review::resolve_review;
use crate::state::AppState;

/// Load a comment reachable through `title_id` -> `review_id`.
async fn resolve_comment(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    resolve_review(pool, title_id, review_id).await?;
    CommentRepo::find_for_review(pool, review_id, comment_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", comment_id)))
}

pub async fn list_comments(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Vec<Comment>> {
    resolve_review(&state.pool, title_id, review_id).await?;
    Ok(CommentRepo::list_for_review(&state.pool, review_id).await?)
}

pub async fn get_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    resolve_comment(&state.pool, title_id, review_id, comment_id).await
}

/// Add a comment under a review. `NotFound` when the review chain or the
/// caller's account is gone.
pub async fn create_comment(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    review_id: DbId,
    input: &CreateComment,
) -> AppResult<Comment> {
    ensure(principal, Action::Create, Resource::Comments)?;
    validate_text("text", &input.text)?;
    resolve_review(&state.pool, title_id, review_id).await?;

    let comment = match CommentRepo::create(&state.pool, review_id, principal.user_id, input).await {
        Ok(comment) => comment,
        Err(e) if yamdb_db::is_foreign_key_violation(&e) => {
            resolve_review(&state.pool, title_id, review_id).await?;
            return Err(AppError::Core(CoreError::not_found("User", principal.user_id)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        user_id = principal.user_id,
        review_id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok(comment)
}

/// Edit a comment. Allowed for its author, moderators and admins.
pub async fn update_comment(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
    input: &UpdateComment,
) -> AppResult<Comment> {
    let existing = resolve_comment(&state.pool, title_id, review_id, comment_id).await?;
    ensure(
        principal,
        Action::Update,
        Resource::Comment {
            author_id: existing.author_id,
        },
    )?;
    if let Some(ref text) = input.text {
        validate_text("text", text)?;
    }

    let comment = CommentRepo::update(&state.pool, comment_id, input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", comment_id)))?;

    tracing::info!(user_id = principal.user_id, comment_id, "Comment updated");
    Ok(comment)
}

pub async fn delete_comment(
    state: &AppState,
    principal: &Principal,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<()> {
    let existing = resolve_comment(&state.pool, title_id, review_id, comment_id).await?;
    ensure(
        principal,
        Action::Delete,
        Resource::Comment {
            author_id: existing.author_id,
        },
    )?;

    if !CommentRepo::delete(&state.pool, comment_id).await? {
        return Err(AppError::Core(CoreError::not_found("Comment", comment_id)));
    }

    tracing::info!(user_id = principal.user_id, comment_id, "Comment deleted");
    Ok(())
}
