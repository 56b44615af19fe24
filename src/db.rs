//! SQLite スキーマ初期化と管理者アカウントの投入

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::services::auth::hash_password;

/// `users` テーブル定義
///
/// - `username` / `email` は UNIQUE（重複登録は制約違反になる）
/// - `password` は argon2id の PHC 文字列
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    full_name TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";
pub const ADMIN_EMAIL: &str = "admin@nima-hospital.com";
pub const ADMIN_FULL_NAME: &str = "Administrator";

/// スキーマ作成と管理者アカウントの投入（冪等）
pub async fn init(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(SCHEMA).execute(pool).await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE username = ?")
        .bind(ADMIN_USERNAME)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        let password_hash = hash_password(ADMIN_PASSWORD)?;
        sqlx::query(
            r#"
            INSERT INTO users (username, password, email, full_name)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(ADMIN_USERNAME)
        .bind(&password_hash)
        .bind(ADMIN_EMAIL)
        .bind(ADMIN_FULL_NAME)
        .execute(pool)
        .await?;

        tracing::info!(username = ADMIN_USERNAME, "管理者アカウントを作成");
    }

    Ok(())
}

/// テスト用のインメモリ SQLite プール
///
/// `sqlite::memory:` は接続ごとに別DBになるため接続数は1に固定
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_seeds_admin_once() {
        let pool = test_pool().await;
        // 2回目は何もしない
        init(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(ADMIN_USERNAME)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_admin_password_is_not_plaintext() {
        let pool = test_pool().await;
        let (stored,): (String,) = sqlx::query_as("SELECT password FROM users WHERE username = ?")
            .bind(ADMIN_USERNAME)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_ne!(stored, ADMIN_PASSWORD);
        assert!(stored.starts_with("$argon2id$"));
    }
}
