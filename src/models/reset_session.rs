/// リセットセッションの状態
///
/// `Idle` はセッション不在、`Completed` はセッション削除で表現する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    CodeIssued,
    Verified,
}

/// メールアドレスに紐づく未使用のリセットコード
#[derive(Debug, Clone)]
pub struct ResetSession {
    pub email: String,
    pub username: String,
    pub code: String,
    pub state: ResetState,
}

impl ResetSession {
    pub fn issued(email: &str, username: &str, code: String) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            code,
            state: ResetState::CodeIssued,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.state == ResetState::Verified
    }
}
