//! Shared fixtures for the application-layer tests.
#![allow(dead_code)]

use sqlx::SqlitePool;
use yamdb_api::config::AppConfig;
use yamdb_api::state::AppState;
use yamdb_core::permissions::Principal;
use yamdb_core::roles::Role;
use yamdb_db::models::category::CreateCategory;
use yamdb_db::models::genre::CreateGenre;
use yamdb_db::models::review::CreateReview;
use yamdb_db::models::title::{CreateTitle, TitleDetail};
use yamdb_db::models::user::CreateUser;
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo, UserRepo};

/// Build a test `AppConfig`. The pool is supplied by `#[sqlx::test]`, so the
/// URL is never dialled.
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 5,
    }
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState::new(pool, test_config())
}

/// Insert a user with `role` and return the matching principal.
pub async fn principal(pool: &SqlitePool, username: &str, role: Role) -> Principal {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: Some(role),
            first_name: None,
            last_name: None,
            bio: None,
        },
    )
    .await
    .unwrap();
    Principal::new(user.id, role)
}

pub async fn admin(pool: &SqlitePool) -> Principal {
    principal(pool, "admin", Role::Admin).await
}

pub async fn moderator(pool: &SqlitePool) -> Principal {
    principal(pool, "moderator", Role::Moderator).await
}

pub async fn user(pool: &SqlitePool, username: &str) -> Principal {
    principal(pool, username, Role::User).await
}

pub fn review(score: i32) -> CreateReview {
    CreateReview {
        text: format!("Worth a {score}"),
        score,
    }
}

pub fn title_input(name: &str, year: i32, category: &str, genre: &[&str]) -> CreateTitle {
    CreateTitle {
        name: name.to_string(),
        year,
        description: None,
        genre: genre.iter().map(|g| g.to_string()).collect(),
        category: category.to_string(),
    }
}

/// Seed a `films` category and return a title in it, created directly
/// through the repository.
pub async fn seed_title(pool: &SqlitePool, name: &str) -> TitleDetail {
    let category = match CategoryRepo::find_by_slug(pool, "films").await.unwrap() {
        Some(c) => c,
        None => CategoryRepo::create(
            pool,
            &CreateCategory {
                name: "Films".to_string(),
                slug: "films".to_string(),
            },
        )
        .await
        .unwrap(),
    };
    TitleRepo::create(pool, &title_input(name, 1999, "films", &[]), Some(category.id), &[])
        .await
        .unwrap()
}

pub async fn seed_genre(pool: &SqlitePool, slug: &str) {
    GenreRepo::create(
        pool,
        &CreateGenre {
            name: slug.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap();
}
