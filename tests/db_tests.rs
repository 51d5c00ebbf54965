use kanban_board::infrastructure::db;

#[tokio::test]
async fn init_db_creates_the_file_and_applies_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kanban.db");
    let url = format!("sqlite:{}", path.display());

    let pool = db::init_db(&url).await.unwrap();
    assert!(path.exists());

    // Migrated schema is queryable.
    sqlx::query("SELECT COUNT(*) FROM users")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_a_board_cascades_to_columns_and_cards() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("kanban.db").display());
    let pool = db::init_db(&url).await.unwrap();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, email_verified, created_at)
         VALUES ('u1', 'Alice', 'alice@example.com', 'x', 0, '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO boards (id, title, owner_id, created_at)
         VALUES ('b1', 'Roadmap', 'u1', '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO columns (id, board_id, title, position, created_at)
         VALUES ('c1', 'b1', 'Todo', 0, '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO cards (id, column_id, title, position, created_at, updated_at)
         VALUES ('k1', 'c1', 'Ship it', 0, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("DELETE FROM boards WHERE id = 'b1'")
        .execute(&pool)
        .await
        .unwrap();

    let columns: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM columns")
        .fetch_one(&pool)
        .await
        .unwrap();
    let cards: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(columns.0, 0);
    assert_eq!(cards.0, 0);
}
