//! # エラーレスポンス
//!
//! すべてのエラー応答で共通のボディ `{ "message": string }` を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はアプリ側の責務（shared に axum 依存を入れない）
//! - 固定文言のエラーは便利コンストラクタで提供し、文言の重複を排除
//! - 内部エラーの詳細はここに載せない

use serde::{Deserialize, Serialize};

/// ルート未登録時の固定メッセージ
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route does not exist";

/// 分類できない障害の固定メッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, try again later";

/// エラーレスポンス
///
/// 常に文字列の `message` を 1 つだけ持つ JSON オブジェクトとして出力される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// 404: どのルートにも一致しなかった
    pub fn route_not_found() -> Self {
        Self::new(ROUTE_NOT_FOUND_MESSAGE)
    }

    /// 500: message は固定値（内部情報を漏らさないため）
    pub fn internal_error() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}
