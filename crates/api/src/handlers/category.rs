//! Handlers for categories.

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::validation::{validate_name, validate_slug, MAX_NAME_LENGTH};
use yamdb_db::models::category::{Category, CategoryListParams, CreateCategory};
use yamdb_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::conflict_on_unique;
use crate::state::AppState;

/// List categories, optionally filtered by a name substring. Public.
pub async fn list_categories(
    state: &AppState,
    params: &CategoryListParams,
) -> AppResult<Vec<Category>> {
    Ok(CategoryRepo::list(&state.pool, params).await?)
}

/// Create a category. Admin only.
pub async fn create_category(
    state: &AppState,
    principal: &Principal,
    input: &CreateCategory,
) -> AppResult<Category> {
    ensure(principal, Action::Create, Resource::Catalog)?;
    validate_name("name", &input.name, MAX_NAME_LENGTH)?;
    validate_slug(&input.slug)?;

    let category = CategoryRepo::create(&state.pool, input)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!("Category with slug '{}' already exists", input.slug)
            })
        })?;

    tracing::info!(
        user_id = principal.user_id,
        category_id = category.id,
        slug = %category.slug,
        "Category created"
    );

    Ok(category)
}

/// Delete a category by slug. Titles in it keep existing without a category.
pub async fn delete_category(state: &AppState, principal: &Principal, slug: &str) -> AppResult<()> {
    ensure(principal, Action::Delete, Resource::Catalog)?;

    let deleted = CategoryRepo::delete_by_slug(&state.pool, slug).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Category", slug)));
    }

    tracing::info!(user_id = principal.user_id, slug, "Category deleted");
    Ok(())
}
