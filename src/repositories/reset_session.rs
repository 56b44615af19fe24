use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::models::{ResetSession, ResetState};

pub type ResetSessionMap = HashMap<String, ResetSession>;

/// メールアドレスごとのリセットセッション（プロセス内メモリのみ）
///
/// 1メールアドレスにつきセッションは最大1件。永続化も有効期限もない。
#[derive(Clone, Default)]
pub struct ResetSessionStore {
    sessions: Arc<Mutex<ResetSessionMap>>,
}

/// `verify` の結果
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Mismatch,
    NoSession,
}

impl ResetSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// セッションを作成（既存セッションは上書き）
    pub async fn issue(&self, email: &str, username: &str, code: String) {
        self.sessions
            .lock()
            .await
            .insert(email.to_string(), ResetSession::issued(email, username, code));
    }

    /// `CodeIssued` 状態のセッションのコードを差し替える
    ///
    /// # Returns
    /// 差し替えた場合はセッションのユーザー名
    pub async fn reissue(&self, email: &str, code: String) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(email) {
            Some(session) if session.state == ResetState::CodeIssued => {
                session.code = code;
                Some(session.username.clone())
            }
            _ => None,
        }
    }

    /// 提出されたコードを照合し、一致すれば `Verified` に遷移
    pub async fn verify(&self, email: &str, submitted: &str) -> VerifyOutcome {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(email) {
            Some(session) if session.code == submitted => {
                session.state = ResetState::Verified;
                VerifyOutcome::Verified
            }
            Some(_) => VerifyOutcome::Mismatch,
            None => VerifyOutcome::NoSession,
        }
    }

    pub async fn get(&self, email: &str) -> Option<ResetSession> {
        self.sessions.lock().await.get(email).cloned()
    }

    /// セッション表全体のロックを取得
    ///
    /// 検証済みチェックからパスワード更新・セッション削除までを
    /// 同じロック下で行うために使う
    pub async fn lock(&self) -> MutexGuard<'_, ResetSessionMap> {
        self.sessions.lock().await
    }
}
