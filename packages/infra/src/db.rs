//! # ドキュメントストア接続管理
//!
//! PostgreSQL 接続プールの作成、マイグレーション適用、起動シーケンス向けの
//! コネクタ抽象を提供する。
//!
//! ## 設計方針
//!
//! - **接続プール**: 毎回接続を張り直すオーバーヘッドを避け、接続を再利用
//! - **単一試行**: 起動時の接続は 1 回だけ試みる。リトライもバックオフもしない
//! - **コネクタ trait**: 起動シーケンスは [`StoreConnector`] 経由でストアを得るため、
//!   DB なしでシーケンス自体をテストできる
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use store_infra::db::{PostgresConnector, StoreConnector};
//!
//! let repository = PostgresConnector.connect("postgres://localhost/store").await?;
//! let products = repository.find_all().await?;
//! ```

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    error::InfraError,
    repository::{PostgresProductRepository, ProductRepository},
};

/// 接続取得のタイムアウト
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL 接続プールを作成する
///
/// `connect` は最初の接続を即座に確立するため、到達不能な URL はここで失敗する。
///
/// # 設定値
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// データベースマイグレーションを実行する
///
/// 適用済みのマイグレーションはスキップされる。sqlx が advisory lock を取るため、
/// 複数プロセスから同時に呼び出しても安全。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 起動シーケンスがストアを得るための抽象
///
/// 接続 URI を受け取り、接続済みの商品リポジトリを返す。
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn ProductRepository>, InfraError>;
}

/// PostgreSQL 用コネクタ
///
/// プール作成 → マイグレーション適用 → リポジトリ生成の順に行う。
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnector;

#[async_trait]
impl StoreConnector for PostgresConnector {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn connect(&self, uri: &str) -> Result<Arc<dyn ProductRepository>, InfraError> {
        let pool = create_pool(uri).await?;
        run_migrations(&pool).await?;
        Ok(Arc::new(PostgresProductRepository::new(pool)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_connector_traitはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn StoreConnector>();
        assert_send_sync::<PostgresConnector>();
    }
}
