//! Privileged HTTP surface: stored moderation reports, ban/unban by raw
//! identity. Bearer-gated here, outside the hub.

use std::sync::Arc;

use axum::{
    debug_handler,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppResult, AppState, Config, Hub};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(reports))
        .route("/ban", post(ban))
        .route("/unban", post(unban))
}

fn authorized(headers: &HeaderMap, config: &Config) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(config.admin_token.as_str())
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "unauthorized").into_response()
}

#[derive(Debug, Serialize, sqlx::FromRow)]
struct ReportRow {
    id: String,
    pairing_id: String,
    reporter: String,
    reported: String,
    reason: Option<String>,
    count: i64,
    created_at: String,
}

#[debug_handler(state = crate::AppState)]
async fn reports(
    State(db_pool): State<SqlitePool>,
    State(config): State<Config>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if !authorized(&headers, &config) {
        return Ok(forbidden());
    }

    let rows: Vec<ReportRow> = sqlx::query_as(
        "SELECT id,pairing_id,reporter,reported,reason,count,created_at
         FROM reports ORDER BY created_at DESC",
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(rows).into_response())
}

#[derive(Debug, Deserialize)]
struct BanRequest {
    identity: Uuid,
    /// Device fingerprint to ban alongside the identity. Required to make
    /// a ban of an offline identity stick across reconnects.
    #[serde(default)]
    fingerprint: Option<String>,
    /// `None` means permanent.
    #[serde(default)]
    duration_minutes: Option<u64>,
}

#[debug_handler(state = crate::AppState)]
async fn ban(
    State(hub): State<Arc<Hub>>,
    State(config): State<Config>,
    headers: HeaderMap,
    Json(req): Json<BanRequest>,
) -> Response {
    if !authorized(&headers, &config) {
        return forbidden();
    }
    hub.ban_identity(req.identity, req.fingerprint, req.duration_minutes, "banned by moderator");
    (StatusCode::OK, "banned").into_response()
}

#[derive(Debug, Deserialize)]
struct UnbanRequest {
    identity: Uuid,
}

#[debug_handler(state = crate::AppState)]
async fn unban(
    State(hub): State<Arc<Hub>>,
    State(config): State<Config>,
    headers: HeaderMap,
    Json(req): Json<UnbanRequest>,
) -> Response {
    if !authorized(&headers, &config) {
        return forbidden();
    }
    hub.unban_identity(req.identity);
    (StatusCode::OK, "unbanned").into_response()
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> Config {
        Config {
            bind_addr: "127.0.0.1:0".into(),
            database_url: "sqlite::memory:".into(),
            admin_token: token.into(),
            match_policy: Default::default(),
            stats_interval_secs: 30,
        }
    }

    #[test]
    fn bearer_token_must_match() {
        let cfg = config("sekrit");
        let mut headers = HeaderMap::new();
        assert!(!authorized(&headers, &cfg));

        headers.insert(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
        assert!(!authorized(&headers, &cfg));

        headers.insert(header::AUTHORIZATION, "Bearer sekrit".parse().unwrap());
        assert!(authorized(&headers, &cfg));
    }

    #[test]
    fn ban_request_carries_an_optional_fingerprint() {
        let req: BanRequest = serde_json::from_value(serde_json::json!({
            "identity": "00000000-0000-0000-0000-000000000000",
        }))
        .unwrap();
        assert!(req.fingerprint.is_none());
        assert!(req.duration_minutes.is_none());

        let req: BanRequest = serde_json::from_value(serde_json::json!({
            "identity": "00000000-0000-0000-0000-000000000000",
            "fingerprint": "device-1",
            "duration_minutes": 30,
        }))
        .unwrap();
        assert_eq!(req.fingerprint.as_deref(), Some("device-1"));
        assert_eq!(req.duration_minutes, Some(30));
    }
}
