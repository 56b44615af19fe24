use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::error::AppError;
use crate::services::auth::NewAccount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub accept_terms: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: PrimitiveDateTime,
}

/// ユーザー登録ハンドラー
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    // 必須項目・パスワード規則は AuthService 側で検証
    if !request.accept_terms {
        return Err(AppError::TermsNotAccepted);
    }

    let account = state
        .auth_service
        .register(NewAccount {
            full_name: &request.full_name,
            email: &request.email,
            username: &request.username,
            password: &request.password,
            confirm_password: &request.confirm_password,
        })
        .await?;

    Ok(Json(RegisterResponse {
        id: account.id,
        username: account.username,
        email: account.email,
        created_at: account.created_at,
    }))
}
