//! # 商品ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/products` - 全商品（挿入順、ページングなし）
//! - `POST /api/v1/products` - 商品作成
//! - `GET /api/v1/products/{id}` - 商品取得
//! - `PUT /api/v1/products/{id}` - ドキュメント全体の置換
//! - `PATCH /api/v1/products/{id}` - 指定フィールドのみ更新
//! - `DELETE /api/v1/products/{id}` - 商品削除
//!
//! パスの `{id}` は [`ProductIdPath`] で受け取る。形式不正やデコードできない値は
//! `Invalid id` として JSON で返る。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use store_domain::product::{ProductDraft, ProductPatch};
use store_infra::repository::ProductRepository;

use crate::{
    error::StoreApiError,
    extract::{JsonBody, ProductIdPath},
};

/// 商品 API の共有状態
///
/// 起動シーケンスで一度だけ構築し、全リクエストで共有する。
pub struct ProductState {
    pub repository: Arc<dyn ProductRepository>,
}

impl ProductState {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

/// GET /api/v1/products
#[tracing::instrument(skip_all)]
pub async fn list_products(
    State(state): State<Arc<ProductState>>,
) -> Result<impl IntoResponse, StoreApiError> {
    let products = state.repository.find_all().await?;
    tracing::debug!(count = products.len(), "商品一覧を取得しました");

    Ok(Json(products))
}

/// POST /api/v1/products
///
/// ## レスポンス
///
/// - `201 Created`: 採番された `_id` を含む商品
/// - `400 Bad Request`: スキーマ違反、商品名の重複、ボディ不正
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<Arc<ProductState>>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<impl IntoResponse, StoreApiError> {
    let product = state.repository.insert(draft).await?;
    tracing::info!(product_id = %product.id(), "商品を作成しました");

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products/{id}
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_product(
    State(state): State<Arc<ProductState>>,
    ProductIdPath(id): ProductIdPath,
) -> Result<impl IntoResponse, StoreApiError> {
    let product = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or(StoreApiError::ProductNotFound(id))?;

    Ok(Json(product))
}

/// PUT /api/v1/products/{id}
///
/// ボディに無いオプションフィールドは消える。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn replace_product(
    State(state): State<Arc<ProductState>>,
    ProductIdPath(id): ProductIdPath,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<impl IntoResponse, StoreApiError> {
    let product = state
        .repository
        .replace(&id, draft)
        .await?
        .ok_or(StoreApiError::ProductNotFound(id))?;
    tracing::info!(product_id = %id, "商品を置換しました");

    Ok(Json(product))
}

/// PATCH /api/v1/products/{id}
///
/// ボディに無いフィールドは現在の値を維持し、`null` は消去する。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_product(
    State(state): State<Arc<ProductState>>,
    ProductIdPath(id): ProductIdPath,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<impl IntoResponse, StoreApiError> {
    let product = state
        .repository
        .merge(&id, patch)
        .await?
        .ok_or(StoreApiError::ProductNotFound(id))?;
    tracing::info!(product_id = %id, "商品を更新しました");

    Ok(Json(product))
}

/// DELETE /api/v1/products/{id}
///
/// 成功時は `204 No Content`。
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_product(
    State(state): State<Arc<ProductState>>,
    ProductIdPath(id): ProductIdPath,
) -> Result<impl IntoResponse, StoreApiError> {
    state
        .repository
        .delete(&id)
        .await?
        .ok_or(StoreApiError::ProductNotFound(id))?;
    tracing::info!(product_id = %id, "商品を削除しました");

    Ok(StatusCode::NO_CONTENT)
}
