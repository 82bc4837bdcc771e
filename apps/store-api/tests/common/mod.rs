//! テスト共通ヘルパー
//!
//! インメモリストアで Router を組み立て、`oneshot` でリクエストを送る。
//! 本番と同じ [`build_app`] を通すため、レイヤー構成・フォールバックも検証対象になる。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use store_api::app_builder::build_app;
use store_infra::mock::InMemoryProductRepository;
use tower::ServiceExt;

/// テスト用レスポンス
pub struct TestResponse {
    pub status:     StatusCode,
    pub request_id: Option<String>,
    pub text:       String,
}

impl TestResponse {
    /// ボディを JSON として解釈する
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|_| panic!("JSON ボディであること: {:?}", self.text))
    }

    /// エラーレスポンスの `message`
    pub fn message(&self) -> String {
        self.json()["message"]
            .as_str()
            .unwrap_or_else(|| panic!("文字列の message を持つこと: {}", self.text))
            .to_string()
    }
}

/// インメモリストアを使う Router と、そのストアのハンドル
pub fn test_app() -> (Router, InMemoryProductRepository) {
    let repository = InMemoryProductRepository::new();
    let app = build_app(Arc::new(repository.clone()));
    (app, repository)
}

/// 生のボディ文字列でリクエストを送る
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        request_id,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// JSON ボディ付きでリクエストを送る
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let body = body.map(|b| b.to_string());
    send_raw(app, method, uri, body.as_deref()).await
}

/// 商品を作成し、採番された `_id` を返す
pub async fn create(app: &Router, body: Value) -> String {
    let response = send(app, Method::POST, "/api/v1/products", Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["_id"].as_str().unwrap().to_string()
}

/// 商品 1 件の URI
pub fn product_uri(id: &str) -> String {
    format!("/api/v1/products/{id}")
}
