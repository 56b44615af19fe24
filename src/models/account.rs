use serde::Serialize;
use sqlx::FromRow;
use time::PrimitiveDateTime;

/// `users` テーブルの1行
///
/// `password` 列には argon2id の PHC 文字列を保存する（平文は保存しない）
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub created_at: PrimitiveDateTime,
}
