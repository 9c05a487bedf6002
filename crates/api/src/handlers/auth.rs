//! Confirmation-code sign-up.
//!
//! `signup` issues a one-time code for a username/email pair and
//! `redeem_confirmation_code` trades it for the caller's [`Principal`].
//! Delivering the code and minting session tokens happen elsewhere.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Principal;
use yamdb_core::roles::Role;
use yamdb_core::validation::{validate_email, validate_text, validate_username};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::conflict_on_unique;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// A freshly issued code, to be delivered to `email` out of band.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationIssued {
    pub username: String,
    pub email: String,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedeemRequest {
    pub username: String,
    pub confirmation_code: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Register a new user, or reissue the code of an existing one whose email
/// matches.
pub async fn signup(state: &AppState, input: &SignupRequest) -> AppResult<ConfirmationIssued> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;

    let user = match UserRepo::find_by_username(&state.pool, &input.username).await? {
        Some(user) if user.email == input.email => user,
        Some(_) => {
            return Err(AppError::Core(CoreError::Validation(
                "email: does not match the address registered for this username".into(),
            )))
        }
        None => register(state, input).await?,
    };

    let code = Uuid::new_v4().to_string();
    if !UserRepo::set_confirmation_code(&state.pool, user.id, &code).await? {
        return Err(AppError::Core(CoreError::not_found("User", &user.username)));
    }

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");

    Ok(ConfirmationIssued {
        username: user.username,
        email: user.email,
        confirmation_code: code,
    })
}

async fn register(state: &AppState, input: &SignupRequest) -> AppResult<User> {
    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "email: already registered to another username".into(),
        )));
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.clone(),
            email: input.email.clone(),
            role: None,
            first_name: None,
            last_name: None,
            bio: None,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, || "A user with this username or email already exists".into()))?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Verify and consume a confirmation code.
///
/// The code is cleared in the same statement that checks it, so a code
/// works once. A wrong or spent code is a validation error.
pub async fn redeem_confirmation_code(
    state: &AppState,
    input: &RedeemRequest,
) -> AppResult<Principal> {
    validate_text("confirmation_code", &input.confirmation_code)?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::not_found("User", &input.username)));
    }

    let user = UserRepo::redeem_confirmation_code(&state.pool, &input.username, &input.confirmation_code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "confirmation_code: invalid or already used".into(),
            ))
        })?;

    let role: Role = user.role.parse()?;

    tracing::info!(user_id = user.id, role = %role, "Confirmation code redeemed");
    Ok(Principal::new(user.id, role))
}
