use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::IssuedCode;
use crate::state::AppState;

// === リセットリクエスト / 再送 ===

#[derive(Debug, Deserialize)]
pub struct ResetRequestRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetRequestResponse {
    pub username: String,
    /// `expose_reset_code` 有効時のみ（デモモード）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// POST /api/password/reset-request
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequestRequest>,
) -> Result<Json<ResetRequestResponse>, AppError> {
    let issued = state
        .password_reset_service
        .request_reset(&request.email)
        .await?;

    Ok(Json(issued_response(
        &state,
        issued,
        "リセットコードを送信しました",
    )))
}

/// POST /api/password/reset-resend
pub async fn resend_reset_code(
    State(state): State<AppState>,
    Json(request): Json<ResetRequestRequest>,
) -> Result<Json<ResetRequestResponse>, AppError> {
    let issued = state
        .password_reset_service
        .resend_code(&request.email)
        .await?;

    Ok(Json(issued_response(
        &state,
        issued,
        "リセットコードを再送しました",
    )))
}

fn issued_response(state: &AppState, issued: IssuedCode, message: &str) -> ResetRequestResponse {
    ResetRequestResponse {
        username: issued.username,
        code: state.config.expose_reset_code.then_some(issued.code),
        message: message.to_string(),
    }
}

// === コード確認 ===

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/password/reset-verify
pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .password_reset_service
        .verify_code(&request.email, &request.code)
        .await?;

    Ok(Json(MessageResponse {
        message: "リセットコードを確認しました".to_string(),
    }))
}

// === パスワードリセット実行 ===

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub username: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// POST /api/password/reset
///
/// # Security
/// - new_password はログに出力しない
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .password_reset_service
        .complete_reset(
            &request.email,
            &request.username,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "パスワードが更新されました。新しいパスワードでログインしてください".to_string(),
    }))
}
