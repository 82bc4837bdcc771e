//! # Store ドメイン層
//!
//! 商品（Product）ドキュメントのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: ストアが採番する識別子を持つ [`product::Product`]
//! - **入力モデル**: 作成・置換用の [`product::ProductDraft`]、部分更新用の
//!   [`product::ProductPatch`]
//! - **スキーマルール**: フィールド単位の検証。違反はすべて列挙して返す
//! - **ドメインエラー**: [`DomainError`]
//!
//! ## 依存関係の方向
//!
//! ```text
//! store-api → store-infra → store-domain
//! ```
//!
//! ドメイン層はインフラ層（DB）にも HTTP にも依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use store_domain::product::ProductDraft;
//!
//! let draft: ProductDraft = serde_json::from_str(r#"{"name":"desk","price":199}"#).unwrap();
//! let fields = draft.validate().unwrap();
//! assert_eq!(fields.name, "desk");
//! ```

pub mod error;
pub mod product;

pub use error::{DomainError, FieldError};
