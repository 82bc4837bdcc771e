//! # インフラ層エラー定義
//!
//! ドキュメントストアとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! ## ストア由来のエラー形状
//!
//! `From<sqlx::Error>` は PostgreSQL の SQLSTATE を見て種別を振り分ける。
//!
//! | SQLSTATE | 種別 |
//! |----------|------|
//! | `23505` unique_violation | [`InfraErrorKind::DuplicateKey`] |
//! | `23502` not_null_violation / `23514` check_violation | [`InfraErrorKind::Validation`] |
//! | `22P02` invalid_text_representation | [`InfraErrorKind::InvalidId`] |
//! | その他 | [`InfraErrorKind::Database`] |

use std::fmt;

use derive_more::Display;
use store_domain::{DomainError, FieldError, error::join_field_errors};
use thiserror::Error;
use tracing_error::SpanTrace;

/// コレクション名（constraint 名の接頭辞）
const COLLECTION_PREFIX: &str = "products_";

/// インフラ層で発生するエラー
///
/// `From` 変換や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 分類できないデータベースエラー（接続断、タイムアウトなど）
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// マイグレーションの適用失敗
    #[error("マイグレーションエラー: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// ストア側スキーマルール違反
    #[error("スキーマ違反: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// 一意制約違反
    #[error("重複キー: {field}")]
    DuplicateKey {
        /// 衝突したフィールド名（例: "name"）
        field: String,
    },

    /// ストアの形式に合わない識別子
    #[error("不正な識別子: {0}")]
    InvalidId(String),

    /// ストアに到達できない
    #[error("ストアに接続できません: {0}")]
    Unavailable(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    fn capture(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    // ===== Convenience constructors =====

    /// 一意制約違反エラーを生成する
    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::DuplicateKey {
            field: field.into(),
        })
    }

    /// 接続不能エラーを生成する
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Unavailable(msg.into()))
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        let classified = source.as_database_error().and_then(|db_err| {
            classify_sqlstate(
                db_err.code().as_deref().unwrap_or_default(),
                db_err.constraint(),
                db_err.message(),
            )
        });

        Self::capture(classified.unwrap_or(InfraErrorKind::Database(source)))
    }
}

impl From<sqlx::migrate::MigrateError> for InfraError {
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::capture(InfraErrorKind::Migration(source))
    }
}

/// スキーマ検証の失敗はストア層のエラーとして扱う
impl From<DomainError> for InfraError {
    fn from(source: DomainError) -> Self {
        match source {
            DomainError::Validation(errors) => Self::capture(InfraErrorKind::Validation(errors)),
            DomainError::InvalidId(id) => Self::capture(InfraErrorKind::InvalidId(id)),
        }
    }
}

/// SQLSTATE からストア由来のエラー形状を判定する
///
/// 分類対象外のコードは `None` を返し、呼び出し側で `Database` として扱う。
pub(crate) fn classify_sqlstate(
    code: &str,
    constraint: Option<&str>,
    message: &str,
) -> Option<InfraErrorKind> {
    match code {
        "23505" => Some(InfraErrorKind::DuplicateKey {
            field: field_from_constraint(constraint),
        }),
        "23502" | "23514" => Some(InfraErrorKind::Validation(vec![FieldError::new(
            field_from_constraint(constraint),
            message,
        )])),
        "22P02" => Some(InfraErrorKind::InvalidId(message.to_string())),
        _ => None,
    }
}

/// constraint 名からフィールド名を導出する
///
/// `products_name_key` → `name`。導出できなければ `document`。
fn field_from_constraint(constraint: Option<&str>) -> String {
    constraint
        .map(|c| c.strip_prefix(COLLECTION_PREFIX).unwrap_or(c))
        .map(|c| {
            c.strip_suffix("_key")
                .or_else(|| c.strip_suffix("_check"))
                .unwrap_or(c)
        })
        .filter(|c| !c.is_empty() && *c != "doc" && *c != "pkey")
        .unwrap_or("document")
        .to_string()
}
