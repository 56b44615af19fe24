use crate::error::AppError;

/// メール送信サービス（開発環境: スタブ実装）
#[derive(Clone, Default)]
pub struct EmailService;

impl EmailService {
    /// 新しい EmailService を作成
    pub fn new() -> Self {
        Self
    }

    /// リセットコードを送信（開発環境: ログ出力のみ）
    pub async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), AppError> {
        tracing::info!(to = %to, "リセットコード送信（開発モード）");
        tracing::debug!("リセットコード: {}", code);

        Ok(())
    }
}
