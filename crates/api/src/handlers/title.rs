//! Handlers for titles.
//!
//! Category and genres are referenced by slug in the payload and resolved to
//! ids here. An unknown slug is a validation error on the payload.

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_description, validate_name, validate_year, MAX_NAME_LENGTH};
use yamdb_db::models::title::{CreateTitle, TitleDetail, TitleFilter, UpdateTitle};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Slug resolution
// ---------------------------------------------------------------------------

async fn resolve_category(pool: &DbPool, slug: &str) -> AppResult<DbId> {
    CategoryRepo::find_by_slug(pool, slug)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "category: no category with slug '{slug}'"
            )))
        })
}

async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let genres = GenreRepo::find_by_slugs(pool, slugs).await?;

    let missing: Vec<&str> = slugs
        .iter()
        .filter(|slug| !genres.iter().any(|g| &g.slug == *slug))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "genre: no genre with slug {}",
            missing
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ))));
    }

    Ok(genres.into_iter().map(|g| g.id).collect())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List titles matching the category/genre/name/year filters. Public.
pub async fn list_titles(state: &AppState, filter: &TitleFilter) -> AppResult<Vec<TitleDetail>> {
    Ok(TitleRepo::list(&state.pool, filter).await?)
}

/// Retrieve a title with its live rating. Public.
pub async fn get_title(state: &AppState, id: DbId) -> AppResult<TitleDetail> {
    TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Title", id)))
}

/// Create a title. Admin only.
pub async fn create_title(
    state: &AppState,
    principal: &Principal,
    input: &CreateTitle,
) -> AppResult<TitleDetail> {
    ensure(principal, Action::Create, Resource::Catalog)?;
    validate_name("name", &input.name, MAX_NAME_LENGTH)?;
    validate_year(input.year)?;
    validate_description(input.description.as_deref())?;

    let category_id = resolve_category(&state.pool, &input.category).await?;
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let title = TitleRepo::create(&state.pool, input, Some(category_id), &genre_ids).await?;

    tracing::info!(
        user_id = principal.user_id,
        title_id = title.id,
        genre_count = genre_ids.len(),
        "Title created"
    );

    Ok(title)
}

/// Partially update a title. A supplied genre list replaces the old one.
pub async fn update_title(
    state: &AppState,
    principal: &Principal,
    id: DbId,
    input: &UpdateTitle,
) -> AppResult<TitleDetail> {
    ensure(principal, Action::Update, Resource::Catalog)?;
    if let Some(ref name) = input.name {
        validate_name("name", name, MAX_NAME_LENGTH)?;
    }
    if let Some(year) = input.year {
        validate_year(year)?;
    }
    validate_description(input.description.as_deref())?;

    let category_id = match input.category {
        Some(ref slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = match input.genre {
        Some(ref slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    let title = TitleRepo::update(&state.pool, id, input, category_id, genre_ids.as_deref())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Title", id)))?;

    tracing::info!(user_id = principal.user_id, title_id = id, "Title updated");
    Ok(title)
}

/// Delete a title together with its reviews and their comments.
pub async fn delete_title(state: &AppState, principal: &Principal, id: DbId) -> AppResult<()> {
    ensure(principal, Action::Delete, Resource::Catalog)?;

    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Title", id)));
    }

    tracing::info!(user_id = principal.user_id, title_id = id, "Title deleted");
    Ok(())
}
