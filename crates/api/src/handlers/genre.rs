//! Handlers for genres.

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::validation::{validate_name, validate_slug, MAX_NAME_LENGTH};
use yamdb_db::models::genre::{CreateGenre, Genre, GenreListParams};
use yamdb_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::conflict_on_unique;
use crate::state::AppState;

pub async fn list_genres(state: &AppState, params: &GenreListParams) -> AppResult<Vec<Genre>> {
    Ok(GenreRepo::list(&state.pool, params).await?)
}

/// Create a genre. Admin only.
pub async fn create_genre(
    state: &AppState,
    principal: &Principal,
    input: &CreateGenre,
) -> AppResult<Genre> {
    ensure(principal, Action::Create, Resource::Catalog)?;
    validate_name("name", &input.name, MAX_NAME_LENGTH)?;
    validate_slug(&input.slug)?;

    let genre = GenreRepo::create(&state.pool, input).await.map_err(|e| {
        conflict_on_unique(e, || format!("Genre with slug '{}' already exists", input.slug))
    })?;

    tracing::info!(
        user_id = principal.user_id,
        genre_id = genre.id,
        slug = %genre.slug,
        "Genre created"
    );

    Ok(genre)
}

/// Delete a genre by slug, unlinking it from every title.
pub async fn delete_genre(state: &AppState, principal: &Principal, slug: &str) -> AppResult<()> {
    ensure(principal, Action::Delete, Resource::Catalog)?;

    if !GenreRepo::delete_by_slug(&state.pool, slug).await? {
        return Err(AppError::Core(CoreError::not_found("Genre", slug)));
    }

    tracing::info!(user_id = principal.user_id, slug, "Genre deleted");
    Ok(())
}
