use std::path::Path;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

async fn migrated_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
    // One connection: an in-memory database is private to its connection.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect_with(options)
        .await
        .expect("pool");

    let migrator = Migrator::new(Path::new("./migrations")).await.expect("migrator");
    migrator.run(&pool).await.expect("migrations");
    pool
}

#[tokio::test]
async fn migrations_create_all_tables() {
    let pool = migrated_pool().await;

    for table in ["users", "subjects", "topics", "questions", "generated_papers"] {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = $1",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .expect("query sqlite_master");
        assert_eq!(found.as_deref(), Some(table), "missing table {table}");
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let pool = migrated_pool().await;

    let migrator = Migrator::new(Path::new("./migrations")).await.expect("migrator");
    migrator.run(&pool).await.expect("re-run migrations");
}

#[tokio::test]
async fn users_default_to_active_students() {
    let pool = migrated_pool().await;

    sqlx::query(
        "INSERT INTO users (username, hashed_password, full_name) VALUES ('u1', 'h', 'U One')",
    )
    .execute(&pool)
    .await
    .expect("insert user");

    let (role, is_active): (String, bool) =
        sqlx::query_as("SELECT role, is_active FROM users WHERE username = 'u1'")
            .fetch_one(&pool)
            .await
            .expect("fetch user");
    assert_eq!(role, "student");
    assert!(is_active);
}

#[tokio::test]
async fn deleting_a_question_author_keeps_the_question() {
    let pool = migrated_pool().await;

    sqlx::query(
        "INSERT INTO users (username, hashed_password, full_name, role) \
         VALUES ('staff1', 'h', 'Staff', 'staff')",
    )
    .execute(&pool)
    .await
    .expect("insert user");
    sqlx::query("INSERT INTO subjects (name) VALUES ('S')").execute(&pool).await.expect("subject");
    sqlx::query("INSERT INTO topics (subject_id, name) VALUES (1, 'T')")
        .execute(&pool)
        .await
        .expect("topic");
    sqlx::query(
        "INSERT INTO questions (user_id, subject_id, topic_id, prompt, marks, difficulty) \
         VALUES (1, 1, 1, 'P', 2, 3)",
    )
    .execute(&pool)
    .await
    .expect("question");

    sqlx::query("DELETE FROM users WHERE id = 1").execute(&pool).await.expect("delete user");

    let owner: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM questions WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("fetch question");
    assert_eq!(owner, None, "authorship should null out, not cascade");
}
