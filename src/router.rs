use axum::{
    Router,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// Router の構築
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/login", post(handlers::login))
        .route("/api/register", post(handlers::register))
        // パスワードリセット: 申請 → コード確認 → 新パスワード確定
        .route(
            "/api/password/reset-request",
            post(handlers::request_password_reset),
        )
        .route(
            "/api/password/reset-resend",
            post(handlers::resend_reset_code),
        )
        .route(
            "/api/password/reset-verify",
            post(handlers::verify_reset_code),
        )
        .route("/api/password/reset", post(handlers::reset_password))
        .route("/api/settings/password", post(handlers::change_password))
        .layer(cors)
        .with_state(state)
}

/// CORS レイヤー（オリジン未設定時は全許可）
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = ?e, "CORS オリジンが不正なため全許可にフォールバック");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}
