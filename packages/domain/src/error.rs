//! # ドメイン層エラー定義
//!
//! スキーマルール違反と識別子の形式不正を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | フィールドがスキーマルールに違反 |
//! | `InvalidId` | 400 Bad Request | 識別子がストアの形式ではない |
//!
//! 「見つからない」はドメインエラーではなく、リポジトリが `None` を返すことで表現する。

use std::fmt;

use thiserror::Error;

/// フィールド単位の検証エラー
///
/// どのフィールドが、なぜ拒否されたかを保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// JSON 上のフィールド名（例: `"price"`）
    pub field:   String,
    /// 人間可読な理由
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 検証エラー一覧を `field: message, field: message` 形式に整形する
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// スキーマルール違反
    ///
    /// 違反したフィールドを 1 件以上保持する。空のまま生成しないこと。
    #[error("バリデーションエラー: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// 識別子の形式不正
    ///
    /// パスで受け取った文字列が UUID として解釈できない場合に使用する。
    #[error("不正な識別子です: {0}")]
    InvalidId(String),
}
