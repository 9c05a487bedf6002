//! Scenario tests for catalog administration and title cascades.

mod common;

use assert_matches::assert_matches;
use chrono::Datelike;
use sqlx::SqlitePool;
use yamdb_api::error::AppError;
use yamdb_api::handlers::{category, comment, genre, review, title};
use yamdb_core::error::CoreError;
use yamdb_db::models::category::{CategoryListParams, CreateCategory};
use yamdb_db::models::comment::CreateComment;
use yamdb_db::models::genre::CreateGenre;
use yamdb_db::models::title::{TitleFilter, UpdateTitle};

use common::{admin, moderator, seed_genre, seed_title, test_state, title_input, user};

fn films() -> CreateCategory {
    CreateCategory {
        name: "Films".to_string(),
        slug: "films".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Categories and genres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_categories(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;

    category::create_category(&state, &admin, &films()).await.unwrap();
    let err = category::create_category(&state, &admin, &films()).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Conflict(_)));

    let listed = category::list_categories(&state, &CategoryListParams::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    category::delete_category(&state, &admin, "films").await.unwrap();
    let err = category::delete_category(&state, &admin, "films").await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { entity: "Category", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_change_catalog(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let plain = user(&pool, "nina").await;
    let moderator = moderator(&pool).await;

    for principal in [plain, moderator] {
        let err = category::create_category(&state, &principal, &films()).await.unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

        let err = genre::create_genre(
            &state,
            &principal,
            &CreateGenre {
                name: "Drama".to_string(),
                slug: "drama".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

        let err = title::create_title(&state, &principal, &title_input("X", 2000, "films", &[]))
            .await
            .unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_slug_rejected(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;

    let err = genre::create_genre(
        &state,
        &admin,
        &CreateGenre {
            name: "Sci-fi".to_string(),
            slug: "sci fi!".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_title_with_slug_references(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;
    category::create_category(&state, &admin, &films()).await.unwrap();
    seed_genre(&pool, "drama").await;
    seed_genre(&pool, "crime").await;

    let created = title::create_title(
        &state,
        &admin,
        &title_input("Goodfellas", 1990, "films", &["drama", "crime"]),
    )
    .await
    .unwrap();

    assert_eq!(created.category.as_ref().unwrap().slug, "films");
    assert_eq!(created.genre.len(), 2);
    assert_eq!(created.rating, None);

    let filtered = title::list_titles(
        &state,
        &TitleFilter {
            genre: Some("crime".to_string()),
            year: Some(1990),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, created.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_slugs_are_validation_errors(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;
    category::create_category(&state, &admin, &films()).await.unwrap();
    seed_genre(&pool, "drama").await;

    let err = title::create_title(&state, &admin, &title_input("A", 2000, "books", &[]))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(ref msg)) if msg.starts_with("category"));

    let err = title::create_title(
        &state,
        &admin,
        &title_input("A", 2000, "films", &["drama", "western"]),
    )
    .await
    .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(ref msg)) if msg.contains("'western'"));

    assert!(title::list_titles(&state, &TitleFilter::default()).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn future_year_rejected(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;
    category::create_category(&state, &admin, &films()).await.unwrap();

    let next_year = chrono::Utc::now().year() + 1;
    let err = title::create_title(&state, &admin, &title_input("Later", next_year, "films", &[]))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(ref msg)) if msg.contains("in the future"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_genres_and_keeps_rest(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;
    seed_genre(&pool, "drama").await;
    seed_genre(&pool, "war").await;
    let t = seed_title(&pool, "Platoon").await;

    let patch = UpdateTitle {
        genre: Some(vec!["war".to_string()]),
        description: Some("Vietnam, 1967".to_string()),
        ..Default::default()
    };
    let updated = title::update_title(&state, &admin, t.id, &patch).await.unwrap();

    assert_eq!(updated.name, "Platoon");
    assert_eq!(updated.description.as_deref(), Some("Vietnam, 1967"));
    let slugs: Vec<&str> = updated.genre.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, ["war"]);

    let err = title::update_title(&state, &admin, 9_999, &UpdateTitle::default())
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { entity: "Title", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_title_removes_reviews_and_comments(pool: SqlitePool) {
    let state = test_state(pool.clone());
    let admin = admin(&pool).await;
    let t = seed_title(&pool, "Scarface").await;

    let mut review_ids = Vec::new();
    for (name, score) in [("ora", 7), ("pat", 8), ("quin", 9)] {
        let author = user(&pool, name).await;
        let r = review::create_review(&state, &author, t.id, &common::review(score))
            .await
            .unwrap();
        comment::create_comment(
            &state,
            &author,
            t.id,
            r.id,
            &CreateComment {
                text: "Still holds up".to_string(),
            },
        )
        .await
        .unwrap();
        review_ids.push(r.id);
    }

    title::delete_title(&state, &admin, t.id).await.unwrap();

    let err = title::get_title(&state, t.id).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { .. }));

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(reviews, 0);
    assert_eq!(comments, 0);
    assert_eq!(review_ids.len(), 3);
}
