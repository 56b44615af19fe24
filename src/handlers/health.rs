use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// ヘルスチェックハンドラー
///
/// GET /api/health
///
/// サービスとデータベースの稼働状況を返す。
/// ロードバランサーやモニタリングツールから呼び出される。
/// DB に到達できない場合は 503 を返す。
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "ok",
                version: env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => {
            tracing::error!(error = ?e, "ヘルスチェック: データベース到達不可");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unreachable",
                    version: env!("CARGO_PKG_VERSION"),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::test_pool;
    use secrecy::SecretBox;

    fn test_config() -> Config {
        Config {
            database_url: SecretBox::new(Box::new("sqlite::memory:".to_string())),
            host: "127.0.0.1".to_string(),
            port: 0,
            db_max_connections: 1,
            expose_reset_code: true,
            cors_allowed_origin: None,
        }
    }

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let state = AppState::new(test_pool().await, test_config());
        let (status, response) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "ok");
        assert_eq!(response.database, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_health_check_reports_closed_pool() {
        let pool = test_pool().await;
        pool.close().await;
        let state = AppState::new(pool, test_config());
        let (status, response) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.database, "unreachable");
    }
}
