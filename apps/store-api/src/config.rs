//! # Store API 設定
//!
//! 環境変数から Store API サーバーの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `DATABASE_URL` | **Yes** | - | ドキュメントストアの接続 URL |
//! | `PORT` | No | `6000` | ポート番号（パースできない値もデフォルトに戻す） |
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//!
//! `LOG_FORMAT` / `RUST_LOG` はトレーシング初期化側（`store_shared::observability`）で読む。
//!
//! 検証は存在チェックのみ。接続 URL の形式はコネクタが判断する。

use std::env;

use thiserror::Error;

/// `PORT` 未設定時のポート番号
pub const DEFAULT_PORT: u16 = 6000;

/// `HOST` 未設定時のバインドアドレス
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定（または空）
    #[error("{0} が設定されていません")]
    Missing(&'static str),
}

/// Store API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreApiConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// ドキュメントストアの接続 URL
    pub database_url: String,
}

impl StoreApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のルックアップ関数から設定を読み込む
    ///
    /// プロセス環境を書き換えずにテストするための入口。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url,
        })
    }

    /// `host:port` 形式のバインド先
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_必須項目のみでデフォルト値が使われる() {
        let config =
            StoreApiConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/store")]))
                .unwrap();

        assert_eq!(
            config,
            StoreApiConfig {
                host:         "0.0.0.0".to_string(),
                port:         6000,
                database_url: "postgres://db/store".to_string(),
            }
        );
    }

    #[test]
    fn test_全項目を指定すると反映される() {
        let config = StoreApiConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/store"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_パースできないportはデフォルトに戻る() {
        let config = StoreApiConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/store"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_database_url未設定はエラー() {
        let result = StoreApiConfig::from_lookup(lookup_from(&[("PORT", "6000")]));

        assert_eq!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_空のdatabase_urlは未設定扱い() {
        let result = StoreApiConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")]));

        assert_eq!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }
}
