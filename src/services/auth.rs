use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::AppError;
use crate::models::Account;
use crate::repositories::AccountRepository;

/// パスワードの最小文字数
pub const MIN_PASSWORD_LEN: usize = 6;

/// パスワードをargon2idでハッシュ化
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = ?e, "パスワードハッシュ生成エラー");
            AppError::Internal(anyhow::anyhow!("password hash error"))
        })?;
    Ok(hash.to_string())
}

/// ユーザー不在時のダミー検証に使う正規の argon2id ハッシュ
///
/// 実ハッシュと同じパラメータで検証コストを揃える
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("nimagate-dummy-password").ok());

/// 新パスワードと確認用パスワードの検証
///
/// 判定順: 未入力 → 不一致 → 文字数不足
pub fn validate_new_password(new_password: &str, confirm_password: &str) -> Result<(), AppError> {
    if new_password.is_empty() || confirm_password.is_empty() {
        return Err(AppError::FieldsRequired);
    }
    if new_password != confirm_password {
        return Err(AppError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::PasswordTooShort);
    }
    Ok(())
}

/// 登録内容
#[derive(Debug)]
pub struct NewAccount<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// 認証サービス
#[derive(Clone)]
pub struct AuthService {
    account_repo: AccountRepository,
}

impl AuthService {
    /// 新しい AuthService を作成
    pub fn new(account_repo: AccountRepository) -> Self {
        Self { account_repo }
    }

    /// アカウント登録
    ///
    /// # Security
    /// - パスワードはログに出力しない
    /// - パスワードは即座にハッシュ化
    pub async fn register(&self, new_account: NewAccount<'_>) -> Result<Account, AppError> {
        let full_name = new_account.full_name.trim();
        let email = new_account.email.trim();
        let username = new_account.username.trim();
        let password = new_account.password.trim();
        let confirm = new_account.confirm_password.trim();

        if [full_name, email, username].iter().any(|f| f.is_empty()) {
            return Err(AppError::FieldsRequired);
        }
        validate_new_password(password, confirm)?;

        self.create_account(full_name, email, username, password)
            .await
    }

    /// アカウントを作成（入力検証なし）
    ///
    /// username / email の重複は `AccountAlreadyExists`
    pub async fn create_account(
        &self,
        full_name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let password_hash = hash_password(password)?;

        let account = self
            .account_repo
            .create(full_name, email, username, &password_hash)
            .await
            .map_err(|e| {
                // UNIQUE制約違反チェック
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    tracing::info!(username = %username, email = %email, "登録失敗: 重複");
                    return AppError::AccountAlreadyExists;
                }
                AppError::Database(e)
            })?;

        tracing::info!(username = %account.username, "アカウント登録成功");

        Ok(account)
    }

    /// ユーザー名とパスワードの組が一致するか
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, AppError> {
        match self.login(username, password).await {
            Ok(_) => Ok(true),
            Err(AppError::Authentication(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// ユーザー認証を実行
    ///
    /// タイミング攻撃対策: ユーザーが存在しない場合もダミーのパスワード検証を実行
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AppError> {
        let account = self.account_repo.find_by_username(username).await?;

        match account {
            Some(account) => {
                if self.verify_password(password, &account.password_hash)? {
                    tracing::info!(username = %username, "認証成功");
                    Ok(account)
                } else {
                    tracing::warn!(username = %username, "認証失敗: パスワード不一致");
                    Err(AppError::Authentication("invalid_credentials".to_string()))
                }
            }
            None => {
                // タイミング攻撃対策: ユーザーが存在しない場合もダミーのパスワード検証を実行
                if let Some(dummy_hash) = DUMMY_HASH.as_deref() {
                    let _ = self.verify_password(password, dummy_hash);
                }
                tracing::warn!(username = %username, "認証失敗: ユーザー不在");
                Err(AppError::Authentication("invalid_credentials".to_string()))
            }
        }
    }

    /// 設定画面からのパスワード変更
    ///
    /// 現在のパスワードで本人確認してから更新する
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AppError> {
        // 登録・ログイン・リセットと同じく前後の空白は除去する
        let current_password = current_password.trim();
        let new_password = new_password.trim();
        let confirm_password = confirm_password.trim();

        validate_new_password(new_password, confirm_password)?;
        self.login(username, current_password).await?;

        let password_hash = hash_password(new_password)?;
        if !self
            .account_repo
            .update_password(username, &password_hash)
            .await?
        {
            return Err(AppError::UpdateFailed);
        }

        tracing::info!(username = %username, "パスワード変更完了");

        Ok(())
    }

    /// パスワードを検証
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!(error = ?e, "パスワードハッシュのパースエラー");
            AppError::Internal(anyhow::anyhow!("password hash parse error"))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn create_test_service() -> AuthService {
        AuthService::new(AccountRepository::new(test_pool().await))
    }

    fn alice<'a>() -> NewAccount<'a> {
        NewAccount {
            full_name: "Alice A",
            email: "alice@x.com",
            username: "alice",
            password: "secret1",
            confirm_password: "secret1",
        }
    }

    #[test]
    fn test_verify_password_logic() {
        let invalid_hash = "invalid_hash_format";
        let parsed = argon2::PasswordHash::new(invalid_hash);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_dummy_hash_is_parseable() {
        // パース失敗するとダミー検証が実行されず応答時間に差が出る
        let dummy_hash = DUMMY_HASH.as_deref().unwrap();
        let parsed = PasswordHash::new(dummy_hash);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().algorithm.as_str(), "argon2id");
    }

    #[tokio::test]
    async fn test_unknown_user_runs_dummy_verification() {
        let service = create_test_service().await;
        let result = service.login("ghost", "whatever").await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
        // ダミーハッシュ自体は検証可能な形式であること
        let dummy_hash = DUMMY_HASH.as_deref().unwrap();
        assert!(!service.verify_password("whatever", dummy_hash).unwrap());
    }

    #[test]
    fn test_validate_new_password_order() {
        assert!(matches!(
            validate_new_password("", "abcdef"),
            Err(AppError::FieldsRequired)
        ));
        assert!(matches!(
            validate_new_password("abcdef", ""),
            Err(AppError::FieldsRequired)
        ));
        // 不一致は文字数より先に判定
        assert!(matches!(
            validate_new_password("abc", "abd"),
            Err(AppError::PasswordMismatch)
        ));
        assert!(matches!(
            validate_new_password("abcde", "abcde"),
            Err(AppError::PasswordTooShort)
        ));
        assert!(validate_new_password("abcdef", "abcdef").is_ok());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // マルチバイト文字は1文字として数える
        assert!(validate_new_password("パスワード!", "パスワード!").is_ok());
        assert!(matches!(
            validate_new_password("パスワード", "パスワード"),
            Err(AppError::PasswordTooShort)
        ));
    }

    #[tokio::test]
    async fn test_seeded_admin_can_login() {
        let service = create_test_service().await;
        assert!(service.verify_credentials("admin", "password").await.unwrap());
        assert!(!service.verify_credentials("admin", "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_and_verify_credentials() {
        let service = create_test_service().await;
        let account = service.register(alice()).await.unwrap();
        assert_eq!(account.username, "alice");
        assert_ne!(account.password_hash, "secret1");

        assert!(service.verify_credentials("alice", "secret1").await.unwrap());
        assert!(!service.verify_credentials("alice", "secret2").await.unwrap());
        assert!(!service.verify_credentials("bob", "secret1").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_username_or_email() {
        let service = create_test_service().await;
        service.register(alice()).await.unwrap();

        let same_username = NewAccount {
            email: "other@x.com",
            ..alice()
        };
        assert!(matches!(
            service.register(same_username).await,
            Err(AppError::AccountAlreadyExists)
        ));

        let same_email = NewAccount {
            username: "alice2",
            ..alice()
        };
        assert!(matches!(
            service.register(same_email).await,
            Err(AppError::AccountAlreadyExists)
        ));

        // 既存アカウントは変更されない
        assert!(service.verify_credentials("alice", "secret1").await.unwrap());
        assert!(!service.verify_credentials("alice2", "secret1").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = create_test_service().await;

        let missing_name = NewAccount {
            full_name: "  ",
            ..alice()
        };
        assert!(matches!(
            service.register(missing_name).await,
            Err(AppError::FieldsRequired)
        ));

        let mismatch = NewAccount {
            confirm_password: "secret2",
            ..alice()
        };
        assert!(matches!(
            service.register(mismatch).await,
            Err(AppError::PasswordMismatch)
        ));

        let short = NewAccount {
            password: "abc",
            confirm_password: "abc",
            ..alice()
        };
        assert!(matches!(
            service.register(short).await,
            Err(AppError::PasswordTooShort)
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = create_test_service().await;
        service.register(alice()).await.unwrap();

        let wrong_current = service
            .change_password("alice", "nope", "newpass1", "newpass1")
            .await;
        assert!(matches!(wrong_current, Err(AppError::Authentication(_))));

        service
            .change_password("alice", "secret1", "newpass1", "newpass1")
            .await
            .unwrap();
        assert!(service.verify_credentials("alice", "newpass1").await.unwrap());
        assert!(!service.verify_credentials("alice", "secret1").await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password_trims_whitespace() {
        let service = create_test_service().await;

        service
            .change_password("admin", " password ", "newpass1 ", " newpass1")
            .await
            .unwrap();

        // ログインは入力を trim するため、保存側も trim 済みであること
        assert!(service.verify_credentials("admin", "newpass1").await.unwrap());
        assert!(!service.verify_credentials("admin", "password").await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password_whitespace_only_is_required() {
        let service = create_test_service().await;
        let result = service
            .change_password("admin", "password", "      ", "      ")
            .await;
        assert!(matches!(result, Err(AppError::FieldsRequired)));
        assert!(service.verify_credentials("admin", "password").await.unwrap());
    }
}
