//! # 起動シーケンス
//!
//! 設定読み込み → ストア接続 → ポートのバインドの順に進める状態機械。
//!
//! ```text
//! Idle → ConfigLoaded → DbConnecting → DbConnected → Listening
//!                            │              │
//!                            └──────────────┴──▶ Failed
//! ```
//!
//! - ストア接続は 1 回だけ試みる。失敗したらポートをバインドせずにエラーを返す
//! - `Listening` 以降の遷移はない。Ctrl+C で受付を止め、処理中のリクエストを流し切って終了する

use store_infra::{InfraError, StoreConnector};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::{app_builder::build_app, config::StoreApiConfig};

/// 起動フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootPhase {
    #[default]
    Idle,
    ConfigLoaded,
    DbConnecting,
    DbConnected,
    Listening,
    Failed,
}

impl BootPhase {
    /// 次のフェーズへ遷移する
    ///
    /// 許可されていない遷移は [`BootError::InvalidTransition`] を返す。
    pub fn advance(self, next: BootPhase) -> Result<BootPhase, BootError> {
        use BootPhase::*;

        match (self, next) {
            (Idle, ConfigLoaded)
            | (ConfigLoaded, DbConnecting)
            | (DbConnecting, DbConnected)
            | (DbConnected, Listening)
            | (DbConnecting, Failed)
            | (DbConnected, Failed) => Ok(next),
            (from, to) => Err(BootError::InvalidTransition { from, to }),
        }
    }
}

/// 起動シーケンスのエラー
#[derive(Debug, Error)]
pub enum BootError {
    /// ストアに接続できない
    #[error("ストアへの接続に失敗しました: {0}")]
    Connect(#[source] InfraError),

    /// ポートをバインドできない
    #[error("{address} をバインドできません: {source}")]
    Bind {
        address: String,
        #[source]
        source:  std::io::Error,
    },

    /// サーバー実行中の I/O エラー
    #[error("サーバーエラー: {0}")]
    Serve(#[source] std::io::Error),

    /// 状態機械にない遷移
    #[error("起動フェーズ {from:?} から {to:?} へは遷移できません")]
    InvalidTransition { from: BootPhase, to: BootPhase },
}

/// 現在のフェーズを保持し、遷移ごとにログを出す
#[derive(Debug, Default)]
struct PhaseTracker {
    phase: BootPhase,
}

impl PhaseTracker {
    fn enter(&mut self, next: BootPhase) -> Result<(), BootError> {
        self.phase = self.phase.advance(next)?;
        match next {
            BootPhase::Failed => tracing::error!(phase = ?next, "起動に失敗しました"),
            _ => tracing::info!(phase = ?next, "起動フェーズを進めました"),
        }
        Ok(())
    }
}

/// サーバーを起動し、Ctrl+C まで待ち受ける
pub async fn start(
    config: &StoreApiConfig,
    connector: &dyn StoreConnector,
) -> Result<(), BootError> {
    start_with_shutdown(config, connector, shutdown_signal()).await
}

/// 終了トリガーを指定してサーバーを起動する
///
/// `shutdown` が完了すると新規接続の受付を止める。
pub async fn start_with_shutdown<F>(
    config: &StoreApiConfig,
    connector: &dyn StoreConnector,
    shutdown: F,
) -> Result<(), BootError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let mut phase = PhaseTracker::default();
    phase.enter(BootPhase::ConfigLoaded)?;

    phase.enter(BootPhase::DbConnecting)?;
    let repository = match connector.connect(&config.database_url).await {
        Ok(repository) => repository,
        Err(err) => {
            tracing::error!(
                error = %err,
                span_trace = %err.span_trace(),
                "ストアに接続できませんでした"
            );
            phase.enter(BootPhase::Failed)?;
            return Err(BootError::Connect(err));
        }
    };
    phase.enter(BootPhase::DbConnected)?;

    let address = config.bind_address();
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(source) => {
            tracing::error!(%address, error = %source, "ポートをバインドできませんでした");
            phase.enter(BootPhase::Failed)?;
            return Err(BootError::Bind { address, source });
        }
    };
    phase.enter(BootPhase::Listening)?;

    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(config.port);
    tracing::info!("Server is listening on port {port}");

    axum::serve(listener, build_app(repository))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(BootError::Serve)?;

    tracing::info!("サーバーを停止しました");
    Ok(())
}

/// Ctrl+C を待つ
///
/// シグナルハンドラを登録できない場合は終了トリガーにしない。
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Ctrl+C ハンドラを登録できませんでした");
        std::future::pending::<()>().await;
    }
    tracing::info!("シャットダウンシグナルを受信しました");
}
