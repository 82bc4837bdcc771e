//! # リクエスト抽出器
//!
//! axum 標準の `Json` / `Path` の拒否はプレーンテキストで返るため、
//! [`StoreApiError`] に変換して `{ "message": string }` で返す抽出器を用意する。
//!
//! - [`JsonBody`]: 構文エラー、型不一致、Content-Type 不正
//! - [`ProductIdPath`]: UTF-8 として解釈できない、または UUID でない `{id}`

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use store_domain::product::ProductId;

use crate::error::StoreApiError;

/// JSON ボディ抽出器
///
/// 失敗時は `400 { "message": "Invalid request body: ..." }` になる。
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = StoreApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// パスの `{id}` を [`ProductId`] として取り出す抽出器
///
/// 失敗時は `400 { "message": "Invalid id : <id>" }` になる。
/// デコードできないセグメントはエンコードされたまま `<id>` に載せる。
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = StoreApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => Ok(Self(ProductId::parse(&raw)?)),
            Err(_) => {
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                Err(StoreApiError::InvalidId(raw.to_string()))
            }
        }
    }
}
