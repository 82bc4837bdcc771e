//! # Store API エラー定義
//!
//! すべての失敗をここで分類し、HTTP ステータスと `{ "message": string }` に変換する。
//! ハンドラはマッピングを持たず、`?` で伝播させるだけにする。
//!
//! ## エラーの階層
//!
//! ```text
//! DomainError ─┐
//! InfraError  ─┼─▶ StoreApiError ──IntoResponse──▶ StatusCode + ErrorResponse
//! JsonRejection┘
//! ```
//!
//! ## マッピング
//!
//! | StoreApiError | HTTP Status | message |
//! |---------------|-------------|---------|
//! | RouteNotFound | 404 | `Route does not exist` |
//! | ProductNotFound | 404 | `No product with id : <id>` |
//! | Validation | 400 | `Validation failed: <field>: <reason>, ...` |
//! | DuplicateKey | 400 | `Duplicate value entered for <field> field, please choose another value` |
//! | InvalidId | 400 | `Invalid id : <id>` |
//! | BadRequest | 400 | `Invalid request body: <reason>` |
//! | Internal | 500 | `Something went wrong, try again later` |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use store_domain::{DomainError, FieldError, error::join_field_errors, product::ProductId};
use store_infra::{InfraError, InfraErrorKind};
use store_shared::ErrorResponse;
use thiserror::Error;

/// Store API で発生するエラー
#[derive(Debug, Error)]
pub enum StoreApiError {
    /// どのルートにも一致しない
    #[error("ルートが存在しません")]
    RouteNotFound,

    /// 指定 ID の商品が存在しない
    #[error("商品が見つかりません: {0}")]
    ProductNotFound(ProductId),

    /// スキーマルール違反
    #[error("バリデーションエラー: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// 一意制約違反
    #[error("重複キー: {field}")]
    DuplicateKey { field: String },

    /// ストアの形式に合わない識別子
    #[error("不正な識別子: {0}")]
    InvalidId(String),

    /// リクエストボディを解釈できない
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 分類できない障害（接続断、プログラミングエラーなど）
    #[error("内部エラー: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreApiError {
    /// HTTP ステータスコード
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound | Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_)
            | Self::DuplicateKey { .. }
            | Self::InvalidId(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// クライアントに返すメッセージ
    ///
    /// `Internal` は固定文言のみ。詳細はログにだけ出す。
    pub fn client_message(&self) -> String {
        match self {
            Self::RouteNotFound => ErrorResponse::route_not_found().message,
            Self::ProductNotFound(id) => format!("No product with id : {id}"),
            Self::Validation(errors) => {
                format!("Validation failed: {}", join_field_errors(errors))
            }
            Self::DuplicateKey { field } => format!(
                "Duplicate value entered for {field} field, please choose another value"
            ),
            Self::InvalidId(id) => format!("Invalid id : {id}"),
            Self::BadRequest(reason) => format!("Invalid request body: {reason}"),
            Self::Internal(_) => ErrorResponse::internal_error().message,
        }
    }
}

impl From<DomainError> for StoreApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => Self::Validation(errors),
            DomainError::InvalidId(id) => Self::InvalidId(id),
        }
    }
}

/// ストア由来のエラー形状を判定し、分類できないものは `Internal` に落とす
impl From<InfraError> for StoreApiError {
    fn from(err: InfraError) -> Self {
        match err.kind() {
            InfraErrorKind::Validation(errors) => Self::Validation(errors.clone()),
            InfraErrorKind::DuplicateKey { field } => Self::DuplicateKey {
                field: field.clone(),
            },
            InfraErrorKind::InvalidId(id) => Self::InvalidId(id.clone()),
            InfraErrorKind::Database(_)
            | InfraErrorKind::Migration(_)
            | InfraErrorKind::Unavailable(_) => Self::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<JsonRejection> for StoreApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for StoreApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Internal(err) => match err.downcast_ref::<InfraError>() {
                Some(infra) => tracing::error!(
                    error = %infra,
                    span_trace = %infra.span_trace(),
                    "ストア障害"
                ),
                None => tracing::error!(error = ?err, "内部エラー"),
            },
            other => tracing::debug!(status = status.as_u16(), error = %other, "リクエストを拒否しました"),
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}
