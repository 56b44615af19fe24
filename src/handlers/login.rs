use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub full_name: String,
}

/// POST /api/login
///
/// # Security
/// - パスワードはログに出力しない
/// - ユーザー不在とパスワード不一致は同じエラーを返す
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = state
        .auth_service
        .login(request.username.trim(), request.password.trim())
        .await?;

    Ok(Json(LoginResponse {
        username: account.username,
        full_name: account.full_name,
    }))
}
