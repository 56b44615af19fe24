use sqlx::SqlitePool;

use crate::models::Account;

#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 新しいアカウントを作成
    ///
    /// # Errors
    /// - UNIQUE制約違反時（username / email 重複）: `sqlx::Error::Database`
    ///   呼び出し側で `AppError::AccountAlreadyExists` に変換すること
    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (full_name, email, username, password)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password, email, full_name, created_at
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// ユーザー名でアカウントを検索
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password, email, full_name, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// メールアドレスからユーザー名を取得
    pub async fn find_username_by_email(&self, email: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(username,)| username))
    }

    /// パスワードを更新
    ///
    /// # Returns
    /// 対象ユーザーが存在し更新された場合 `true`
    ///
    /// # Note
    /// password_hash はログに出力しないこと
    pub async fn update_password(
        &self,
        username: &str,
        new_password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password = ? WHERE username = ?")
            .bind(new_password_hash)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
