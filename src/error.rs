use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("認証エラー: {0}")]
    Authentication(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),

    #[error("ユーザー名またはメールアドレスは既に使用されています")]
    AccountAlreadyExists,

    #[error("すべての項目を入力してください")]
    FieldsRequired,

    #[error("パスワードが一致しません")]
    PasswordMismatch,

    #[error("パスワードは6文字以上で入力してください")]
    PasswordTooShort,

    #[error("利用規約に同意してください")]
    TermsNotAccepted,

    #[error("メールアドレスが登録されていません")]
    UnknownEmail,

    #[error("入力が空です")]
    EmptyInput,

    #[error("リセットコードが無効です")]
    InvalidCode,

    #[error("有効なリセットコードがありません")]
    NoPendingCode,

    #[error("リセットコードが確認されていません")]
    NotVerified,

    #[error("パスワードを更新できませんでした")]
    UpdateFailed,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                return internal_error_response();
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                return internal_error_response();
            }
            Self::AccountAlreadyExists => StatusCode::CONFLICT,
            Self::UnknownEmail => StatusCode::NOT_FOUND,
            Self::UpdateFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::FieldsRequired
            | Self::PasswordMismatch
            | Self::PasswordTooShort
            | Self::TermsNotAccepted
            | Self::EmptyInput
            | Self::InvalidCode
            | Self::NoPendingCode
            | Self::NotVerified => StatusCode::BAD_REQUEST,
        };

        let message = match &self {
            Self::Authentication(_) => "ユーザー名またはパスワードが正しくありません".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "内部エラーが発生しました".to_string(),
        }),
    )
        .into_response()
}
