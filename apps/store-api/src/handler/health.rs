//! # バナー・ヘルスチェックハンドラ
//!
//! ```text
//! GET /        → 200 "Store api"
//! GET /health  → 200 {"status":"healthy","version":"0.1.0"}
//! ```
//!
//! どちらもストアには触れない。

use axum::Json;
use store_shared::HealthResponse;

/// ルートのバナー（プレーンテキスト）
pub async fn index() -> &'static str {
    "Store api"
}

/// ヘルスチェックエンドポイント
///
/// プロセスが起動していれば常に 200 を返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
