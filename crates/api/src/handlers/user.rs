//! Handlers for user accounts: the admin directory and the caller's own
//! profile ("me").

use yamdb_core::error::CoreError;
use yamdb_core::permissions::{ensure, Action, Principal, Resource};
use yamdb_core::validation::{validate_email, validate_person_name, validate_username};
use yamdb_db::models::user::{
    CreateUser, UpdateProfile, UpdateUser, UserListParams, UserResponse,
};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::conflict_on_unique;
use crate::state::AppState;

fn validate_profile_fields(
    username: Option<&str>,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(username) = username {
        validate_username(username)?;
    }
    if let Some(email) = email {
        validate_email(email)?;
    }
    validate_person_name("first_name", first_name)?;
    validate_person_name("last_name", last_name)?;
    Ok(())
}

fn taken() -> String {
    "A user with this username or email already exists".to_string()
}

// ---------------------------------------------------------------------------
// Admin directory
// ---------------------------------------------------------------------------

pub async fn list_users(
    state: &AppState,
    principal: &Principal,
    params: &UserListParams,
) -> AppResult<Vec<UserResponse>> {
    ensure(principal, Action::Read, Resource::Users)?;
    let users = UserRepo::list(&state.pool, params).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

pub async fn create_user(
    state: &AppState,
    principal: &Principal,
    input: &CreateUser,
) -> AppResult<UserResponse> {
    ensure(principal, Action::Create, Resource::Users)?;
    validate_profile_fields(
        Some(input.username.as_str()),
        Some(input.email.as_str()),
        input.first_name.as_deref(),
        input.last_name.as_deref(),
    )?;

    let user = UserRepo::create(&state.pool, input)
        .await
        .map_err(|e| conflict_on_unique(e, taken))?;

    tracing::info!(
        admin_id = principal.user_id,
        user_id = user.id,
        role = %user.role,
        "User created"
    );

    Ok(user.into())
}

pub async fn get_user(
    state: &AppState,
    principal: &Principal,
    username: &str,
) -> AppResult<UserResponse> {
    ensure(principal, Action::Read, Resource::Users)?;
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", username)))?;
    Ok(user.into())
}

/// Partially update any account, including its role. Admin only.
pub async fn update_user(
    state: &AppState,
    principal: &Principal,
    username: &str,
    input: &UpdateUser,
) -> AppResult<UserResponse> {
    ensure(principal, Action::Update, Resource::Users)?;
    validate_profile_fields(
        input.username.as_deref(),
        input.email.as_deref(),
        input.first_name.as_deref(),
        input.last_name.as_deref(),
    )?;

    let existing = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", username)))?;

    let user = UserRepo::update(&state.pool, existing.id, input)
        .await
        .map_err(|e| conflict_on_unique(e, taken))?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", username)))?;

    tracing::info!(
        admin_id = principal.user_id,
        user_id = user.id,
        role = %user.role,
        "User updated"
    );

    Ok(user.into())
}

/// Delete an account with its reviews and comments. Admin only.
pub async fn delete_user(state: &AppState, principal: &Principal, username: &str) -> AppResult<()> {
    ensure(principal, Action::Delete, Resource::Users)?;

    if !UserRepo::delete_by_username(&state.pool, username).await? {
        return Err(AppError::Core(CoreError::not_found("User", username)));
    }

    tracing::info!(admin_id = principal.user_id, username, "User deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

pub async fn get_me(state: &AppState, principal: &Principal) -> AppResult<UserResponse> {
    ensure(
        principal,
        Action::Read,
        Resource::Account {
            user_id: principal.user_id,
        },
    )?;
    let user = UserRepo::find_by_id(&state.pool, principal.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", principal.user_id)))?;
    Ok(user.into())
}

/// Update the caller's own profile. The role is left untouched.
pub async fn update_me(
    state: &AppState,
    principal: &Principal,
    input: UpdateProfile,
) -> AppResult<UserResponse> {
    ensure(
        principal,
        Action::Update,
        Resource::Account {
            user_id: principal.user_id,
        },
    )?;
    validate_profile_fields(
        input.username.as_deref(),
        input.email.as_deref(),
        input.first_name.as_deref(),
        input.last_name.as_deref(),
    )?;

    let changes = UpdateUser::from(input);
    let user = UserRepo::update(&state.pool, principal.user_id, &changes)
        .await
        .map_err(|e| conflict_on_unique(e, taken))?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", principal.user_id)))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(user.into())
}
