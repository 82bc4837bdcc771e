//! # ルーター構築
//!
//! ルート定義と共通レイヤーを組み立て、`axum::serve` に渡す [`Router`] を返す。
//! 起動シーケンスとテストの双方がここを通るため、本番と同じ構成をテストできる。

use std::sync::Arc;

use axum::{Router, routing::get};
use store_infra::repository::ProductRepository;
use store_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        ProductState,
        create_product,
        delete_product,
        get_product,
        health_check,
        index,
        list_products,
        replace_product,
        update_product,
    },
    middleware::{handle_panic, not_found},
};

/// 商品リソースのパス
pub const PRODUCTS_PATH: &str = "/api/v1/products";

/// アプリケーションの Router を構築する
///
/// ストアへのハンドルは引数で受け取り、ハンドラへは `State` 経由で渡す。
pub fn build_app(repository: Arc<dyn ProductRepository>) -> Router {
    let product_state = Arc::new(ProductState::new(repository));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route(PRODUCTS_PATH, get(list_products).post(create_product))
        // 末尾スラッシュ付きでも一覧・作成を受け付ける
        .route(
            &format!("{PRODUCTS_PATH}/"),
            get(list_products).post(create_product),
        )
        .route(
            &format!("{PRODUCTS_PATH}/{{id}}"),
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(product_state)
        // レイヤーは下から順に外側になる:
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: request_id 入りのスパンを作り、以降のログに付与
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. CatchPanicLayer（最内）: パニックを 500 の JSON にする
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
