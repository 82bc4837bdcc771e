//! # Store インフラ層
//!
//! ドキュメントストアとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **ストア接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: 商品コレクションの CRUD とスキーマ検証
//! - **エラー分類**: ストア由来のエラー形状（重複キー、スキーマ違反など）の判定
//!
//! ## 依存関係
//!
//! ```text
//! store-api → store-infra → store-domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、[`StoreConnector`]
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use db::{PostgresConnector, StoreConnector};
pub use error::{InfraError, InfraErrorKind};
