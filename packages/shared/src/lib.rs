//! # Store 共有ユーティリティ
//!
//! ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - api / infra から依存される（domain からは依存しない）
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない。HTTP レスポンスへの変換は各アプリの責務

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
