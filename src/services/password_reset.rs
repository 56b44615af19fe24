use rand::Rng;

use crate::error::AppError;
use crate::repositories::{AccountRepository, ResetSessionStore, VerifyOutcome};
use crate::services::EmailService;
use crate::services::auth::{hash_password, validate_new_password};

/// リセットコードの桁数
pub const RESET_CODE_LEN: usize = 6;

/// 発行したリセットコード
///
/// 外部配送手段がないため呼び出し側にも返す（デモモード）
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub username: String,
    pub code: String,
}

/// パスワードリセットサービス
///
/// メールアドレス単位の状態遷移:
/// Idle → CodeIssued → Verified → Completed（セッション削除）
#[derive(Clone)]
pub struct PasswordResetService {
    account_repo: AccountRepository,
    sessions: ResetSessionStore,
    email_service: EmailService,
}

impl PasswordResetService {
    /// 新しい PasswordResetService を作成
    pub fn new(
        account_repo: AccountRepository,
        sessions: ResetSessionStore,
        email_service: EmailService,
    ) -> Self {
        Self {
            account_repo,
            sessions,
            email_service,
        }
    }

    /// パスワードリセットをリクエスト
    ///
    /// 既存セッションがあれば状態に関わらず上書きする
    pub async fn request_reset(&self, email: &str) -> Result<IssuedCode, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::EmptyInput);
        }

        tracing::info!(email = %email, "パスワードリセットリクエスト");

        let username = match self.account_repo.find_username_by_email(email).await? {
            Some(username) => username,
            None => {
                tracing::info!(email = %email, "パスワードリセット: メールアドレス未登録");
                return Err(AppError::UnknownEmail);
            }
        };

        let code = generate_reset_code();
        self.sessions.issue(email, &username, code.clone()).await;
        self.email_service.send_reset_code(email, &code).await?;

        tracing::info!(email = %email, username = %username, "リセットコード発行");

        Ok(IssuedCode { username, code })
    }

    /// リセットコードを再発行
    ///
    /// `CodeIssued` 状態のセッションがある場合のみ有効
    pub async fn resend_code(&self, email: &str) -> Result<IssuedCode, AppError> {
        let email = email.trim();
        let code = generate_reset_code();

        let username = self
            .sessions
            .reissue(email, code.clone())
            .await
            .ok_or_else(|| {
                tracing::warn!(email = %email, "再送失敗: 発行済みコードなし");
                AppError::NoPendingCode
            })?;
        self.email_service.send_reset_code(email, &code).await?;

        tracing::info!(email = %email, "リセットコード再発行");

        Ok(IssuedCode { username, code })
    }

    /// リセットコードを照合
    ///
    /// 試行回数の制限はない
    pub async fn verify_code(&self, email: &str, submitted_code: &str) -> Result<(), AppError> {
        let email = email.trim();
        let submitted_code = submitted_code.trim();
        if submitted_code.is_empty() {
            return Err(AppError::EmptyInput);
        }

        match self.sessions.verify(email, submitted_code).await {
            VerifyOutcome::Verified => {
                tracing::info!(email = %email, "リセットコード確認完了");
                Ok(())
            }
            VerifyOutcome::Mismatch | VerifyOutcome::NoSession => {
                tracing::warn!(email = %email, "無効なリセットコード");
                Err(AppError::InvalidCode)
            }
        }
    }

    /// 新しいパスワードを確定
    ///
    /// # Security
    /// - 新パスワードはログに出力しない
    /// - 検証済み確認から更新・セッション削除までセッション表のロックを保持する
    ///   （ハッシュ化はロック取得前に行う）
    pub async fn complete_reset(
        &self,
        email: &str,
        username: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AppError> {
        let email = email.trim();
        let new_password = new_password.trim();
        let confirm_password = confirm_password.trim();

        validate_new_password(new_password, confirm_password)?;
        let password_hash = hash_password(new_password)?;

        let mut sessions = self.sessions.lock().await;
        let verified = sessions
            .get(email)
            .is_some_and(|s| s.is_verified() && s.username == username);
        if !verified {
            tracing::warn!(email = %email, "未確認のリセットセッション");
            return Err(AppError::NotVerified);
        }

        if !self
            .account_repo
            .update_password(username, &password_hash)
            .await?
        {
            tracing::warn!(username = %username, "パスワード更新対象なし");
            return Err(AppError::UpdateFailed);
        }

        sessions.remove(email);

        tracing::info!(email = %email, username = %username, "パスワードリセット完了");

        Ok(())
    }
}

/// 6桁の数字コードを生成（各桁独立・一様）
pub fn generate_reset_code() -> String {
    let mut rng = rand::thread_rng();
    (0..RESET_CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
