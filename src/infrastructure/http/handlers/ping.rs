//! Ping Handler

use axum::Json;
use serde::Serialize;

use crate::infrastructure::http::dto::Envelope;

/// 服务状态
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// 健康检查，无需认证
pub async fn ping() -> Json<Envelope<PingResponse>> {
    Json(Envelope::ok(
        "pong",
        PingResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}
