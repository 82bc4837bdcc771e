//! # Store API エントリーポイント
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env から DATABASE_URL を読む）
//! cargo run -p store-api
//!
//! # 本番環境
//! PORT=6000 DATABASE_URL=postgres://... LOG_FORMAT=json cargo run -p store-api --release
//! ```
//!
//! 設定不備・ストア接続失敗はログに出したうえで終了コード 1 で終了する。

use anyhow::Context as _;
use store_api::{bootstrap, config::StoreApiConfig};
use store_infra::PostgresConnector;
use store_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;

const SERVICE_NAME: &str = "store-api";

/// シングルスレッドのランタイムで起動する
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    init_tracing(&tracing_config);

    let span = tracing::info_span!("app", service = %tracing_config.service_name);
    run().instrument(span).await
}

async fn run() -> anyhow::Result<()> {
    let config = StoreApiConfig::from_env()
        .inspect_err(|err| tracing::error!(error = %err, "設定の読み込みに失敗しました"))
        .context("設定の読み込みに失敗しました")?;

    bootstrap::start(&config, &PostgresConnector)
        .await
        .context("サーバーを起動できませんでした")
}
