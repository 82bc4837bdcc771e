//! # 終端ミドルウェア
//!
//! - [`not_found`]: どのルートにも一致しなかったリクエストの応答
//! - [`handle_panic`]: `CatchPanicLayer` に渡すパニック時の応答
//!
//! どちらも `{ "message": string }` 形式の JSON を返す。

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use store_shared::ErrorResponse;

use crate::error::StoreApiError;

/// ルート未登録のフォールバック
///
/// パス不一致とメソッド不一致の両方に使う（405 ではなく 404 を返す）。
pub async fn not_found() -> StoreApiError {
    StoreApiError::RouteNotFound
}

/// ハンドラ内のパニックを 500 に変換する
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = detail, "ハンドラがパニックしました");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal_error()),
    )
        .into_response()
}
