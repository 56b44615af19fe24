use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
}

/// POST /api/settings/password
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, AppError> {
    state
        .auth_service
        .change_password(
            request.username.trim(),
            &request.current_password,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;

    Ok(Json(ChangePasswordResponse {
        message: "パスワードを更新しました".to_string(),
    }))
}
