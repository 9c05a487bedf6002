use sqlx::SqlitePool;

/// Full bootstrap test: migrate, health check, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    yamdb_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "categories",
        "genres",
        "titles",
        "title_genres",
        "reviews",
        "comments",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Titles must not carry a stored rating column.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_titles_have_no_rating_column(pool: SqlitePool) {
    let columns: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('titles')")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert!(!columns.is_empty());
    assert!(columns.iter().all(|(name,)| name != "rating"));
}

/// Foreign keys are enforced on pooled connections.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys_enabled(pool: SqlitePool) {
    let enabled: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled.0, 1);
}
