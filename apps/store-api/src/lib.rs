//! # Store API サーバー
//!
//! 商品（Product）ドキュメントの CRUD を提供する HTTP API。
//!
//! ## リクエストの流れ
//!
//! ```text
//! TCP ─▶ SetRequestId ─▶ Trace ─▶ PropagateRequestId ─▶ CatchPanic ─▶ Router
//!                                                                      │
//!                     ┌────────────────────────────────────────────────┤
//!                     ▼                                                ▼
//!              商品ハンドラ ──Err──▶ StoreApiError::into_response   not_found
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`bootstrap`] - 起動シーケンス（設定 → ストア接続 → リッスン）
//! - [`app_builder`] - ルート定義とレイヤー構成
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - 未登録ルートとパニックの終端処理
//! - [`extract`] - JSON ボディ抽出器
//! - [`error`] - 失敗の分類と HTTP レスポンスへの変換
//!
//! ## 依存関係
//!
//! - `store_domain`: 商品モデル、スキーマルール
//! - `store_infra`: ストア接続とリポジトリ
//! - `store_shared`: エラーレスポンス、トレーシング初期化

pub mod app_builder;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
