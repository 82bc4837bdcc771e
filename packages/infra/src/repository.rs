//! # リポジトリ
//!
//! 商品コレクションの永続化インターフェースと実装を提供する。
//!
//! ## 設計方針
//!
//! - **スキーマ検証はストア層**: 書き込み前に必ずスキーマルールを適用する。
//!   実装ごとに検証を漏らさないよう、入力は未検証の `ProductDraft` / `ProductPatch` で受け取る
//! - **見つからないは `None`**: エラーではなく `Option` で表現する
//! - **テスタビリティ**: トレイト経由で差し替え可能な設計

pub mod product_repository;

pub use product_repository::{PostgresProductRepository, ProductRepository};
