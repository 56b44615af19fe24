use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::repositories::{AccountRepository, ResetSessionStore};
use crate::services::{AuthService, EmailService, PasswordResetService};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// SQLite コネクションプール
    pub db_pool: SqlitePool,
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
    /// 認証サービス
    pub auth_service: AuthService,
    /// パスワードリセットサービス（リセットセッションを保持）
    pub password_reset_service: PasswordResetService,
}

impl AppState {
    /// 新しい AppState を作成
    ///
    /// リセットセッションはここで1つだけ作成され、プロセス終了まで共有される
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        let config = Arc::new(config);
        let account_repo = AccountRepository::new(db_pool.clone());
        let auth_service = AuthService::new(account_repo.clone());
        let password_reset_service = PasswordResetService::new(
            account_repo,
            ResetSessionStore::new(),
            EmailService::new(),
        );

        Self {
            db_pool,
            config,
            auth_service,
            password_reset_service,
        }
    }
}
