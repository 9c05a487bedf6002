//! Fixture builders shared by the repository integration tests.
#![allow(dead_code)]

use sqlx::SqlitePool;
use yamdb_core::types::DbId;
use yamdb_db::models::category::{Category, CreateCategory};
use yamdb_db::models::genre::{CreateGenre, Genre};
use yamdb_db::models::review::{CreateReview, Review};
use yamdb_db::models::title::{CreateTitle, TitleDetail};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, ReviewRepo, TitleRepo, UserRepo};

pub fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: None,
        first_name: None,
        last_name: None,
        bio: None,
    }
}

pub fn new_title(name: &str, year: i32, category: &str) -> CreateTitle {
    CreateTitle {
        name: name.to_string(),
        year,
        description: None,
        genre: vec![],
        category: category.to_string(),
    }
}

pub fn new_review(score: i32) -> CreateReview {
    CreateReview {
        text: format!("Scored {score}"),
        score,
    }
}

pub async fn seed_user(pool: &SqlitePool, username: &str) -> User {
    UserRepo::create(pool, &new_user(username)).await.unwrap()
}

pub async fn seed_category(pool: &SqlitePool, slug: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_genre(pool: &SqlitePool, slug: &str) -> Genre {
    GenreRepo::create(
        pool,
        &CreateGenre {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Create a title in a fresh category with the given genre ids.
pub async fn seed_title(pool: &SqlitePool, name: &str, genre_ids: &[DbId]) -> TitleDetail {
    let category = seed_category(pool, &format!("cat-{}", name.to_lowercase().replace(' ', "-"))).await;
    TitleRepo::create(pool, &new_title(name, 2001, &category.slug), Some(category.id), genre_ids)
        .await
        .unwrap()
}

/// Add one review per score, each from a new author.
pub async fn seed_reviews(pool: &SqlitePool, title_id: DbId, scores: &[i32]) -> Vec<Review> {
    let mut reviews = Vec::with_capacity(scores.len());
    for (i, score) in scores.iter().enumerate() {
        let author = seed_user(pool, &format!("critic{title_id}_{i}")).await;
        reviews.push(
            ReviewRepo::create(pool, title_id, author.id, &new_review(*score))
                .await
                .unwrap(),
        );
    }
    reviews
}
