//! # 商品 API の統合テスト
//!
//! インメモリストアに対して Router 全体を通し、以下を検証する。
//!
//! - 作成した商品は `_id` 以外そのまま取得できる
//! - 存在しない ID への取得・更新・削除は 404（500 にはならない）
//! - ストア由来の失敗（スキーマ違反、重複、形式不正）は 400
//! - 分類できない障害・パニックは 500 で、詳細は返さない

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{create, product_uri, send, send_raw, test_app};
use pretty_assertions::assert_eq;
use serde_json::json;
use store_api::app_builder::build_app;
use store_domain::product::{Product, ProductDraft, ProductId, ProductPatch};
use store_infra::{InfraError, repository::ProductRepository};

// ===== 作成・取得 =====

#[tokio::test]
async fn test_作成した商品をidで取得すると同じドキュメントが返る() {
    let (app, _) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(json!({"name": "desk", "price": 199})),
    )
    .await;

    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json();
    let id = body["_id"].as_str().unwrap().to_string();
    assert_eq!(body, json!({"name": "desk", "price": 199, "_id": id}));

    let fetched = send(&app, Method::GET, &product_uri(&id), None).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), body);
}

#[tokio::test]
async fn test_オプションフィールドも往復で保たれる() {
    let (app, _) = test_app();
    let payload = json!({
        "name": "armchair",
        "price": 25.99,
        "featured": true,
        "rating": 4.5,
        "company": "ikea"
    });

    let id = create(&app, payload.clone()).await;
    let fetched = send(&app, Method::GET, &product_uri(&id), None).await;

    let mut expected = payload;
    expected["_id"] = json!(id);
    assert_eq!(fetched.json(), expected);
}

#[tokio::test]
async fn test_一覧は作成した件数だけ返す() {
    let (app, repository) = test_app();
    for name in ["desk", "chair", "lamp"] {
        create(&app, json!({"name": name, "price": 10})).await;
    }

    let response = send(&app, Method::GET, "/api/v1/products", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<String> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["desk", "chair", "lamp"]);
    assert_eq!(repository.len(), 3);
}

#[tokio::test]
async fn test_一覧は繰り返し読んでも重複しない() {
    let (app, _) = test_app();
    create(&app, json!({"name": "desk", "price": 10})).await;

    let first = send(&app, Method::GET, "/api/v1/products", None).await;
    let second = send(&app, Method::GET, "/api/v1/products", None).await;

    assert_eq!(first.json().as_array().unwrap().len(), 1);
    assert_eq!(first.json(), second.json());
}

#[tokio::test]
async fn test_末尾スラッシュ付きでも一覧と作成ができる() {
    let (app, _) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/products/",
        Some(json!({"name": "desk", "price": 199})),
    )
    .await;
    let listed = send(&app, Method::GET, "/api/v1/products/", None).await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_空のストアの一覧は空配列() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/api/v1/products", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

// ===== 見つからない =====

#[tokio::test]
async fn test_存在しないidへの操作はすべて404() {
    let (app, _) = test_app();
    let id = ProductId::new().to_string();
    let uri = product_uri(&id);
    let expected = format!("No product with id : {id}");

    let requests = [
        (Method::GET, None),
        (Method::PUT, Some(json!({"name": "desk", "price": 1}))),
        (Method::PATCH, Some(json!({"price": 1}))),
        (Method::DELETE, None),
    ];

    for (method, body) in requests {
        let response = send(&app, method.clone(), &uri, body).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(response.message(), expected, "{method}");
    }
}

#[tokio::test]
async fn test_削除後の取得は404() {
    let (app, repository) = test_app();
    let id = create(&app, json!({"name": "desk", "price": 199})).await;

    let deleted = send(&app, Method::DELETE, &product_uri(&id), None).await;
    let fetched = send(&app, Method::GET, &product_uri(&id), None).await;

    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.text, "");
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert!(repository.is_empty());
}

// ===== 更新 =====

#[tokio::test]
async fn test_putはドキュメント全体を置き換える() {
    let (app, _) = test_app();
    let id = create(&app, json!({"name": "desk", "price": 199, "featured": true})).await;

    let response = send(
        &app,
        Method::PUT,
        &product_uri(&id),
        Some(json!({"name": "standing desk", "price": 299})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"name": "standing desk", "price": 299, "_id": id})
    );
}

#[tokio::test]
async fn test_patchは指定フィールドのみ更新する() {
    let (app, _) = test_app();
    let id = create(&app, json!({"name": "desk", "price": 199, "featured": true})).await;

    let response = send(&app, Method::PATCH, &product_uri(&id), Some(json!({"price": 149}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"name": "desk", "price": 149, "featured": true, "_id": id})
    );
}

#[tokio::test]
async fn test_patchのnullはオプションフィールドを消去する() {
    let (app, _) = test_app();
    let id = create(&app, json!({"name": "desk", "price": 199, "rating": 3})).await;

    let response = send(&app, Method::PATCH, &product_uri(&id), Some(json!({"rating": null}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"name": "desk", "price": 199, "_id": id}));
}

#[tokio::test]
async fn test_patchで必須フィールドをnullにするとスキーマ違反() {
    let (app, _) = test_app();
    let id = create(&app, json!({"name": "desk", "price": 199})).await;

    let response = send(&app, Method::PATCH, &product_uri(&id), Some(json!({"name": null}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Validation failed: name: Please provide product name"
    );
}

// ===== ストア由来の 400 =====

#[tokio::test]
async fn test_形式不正なidは400() {
    let (app, _) = test_app();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method.clone(), &product_uri("not-an-id"), None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(response.message(), "Invalid id : not-an-id", "{method}");
    }
}

#[tokio::test]
async fn test_utf8として解釈できないidは400のjson() {
    let (app, _) = test_app();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method.clone(), &product_uri("%FF"), None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(response.message(), "Invalid id : %FF", "{method}");
    }
}

#[tokio::test]
async fn test_存在しないidへの不正なputは404ではなくスキーマ違反() {
    let (app, _) = test_app();
    let id = ProductId::new().to_string();

    let response = send(&app, Method::PUT, &product_uri(&id), Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Validation failed: name: Please provide product name, price: Please provide product price"
    );
}

#[tokio::test]
async fn test_必須フィールド欠落は全フィールドを列挙した400() {
    let (app, repository) = test_app();

    let response = send(&app, Method::POST, "/api/v1/products", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Validation failed: name: Please provide product name, price: Please provide product price"
    );
    assert!(repository.is_empty());
}

#[tokio::test]
async fn test_範囲外の値とサポート外のメーカーは400() {
    let (app, _) = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(json!({"name": "desk", "price": -1, "rating": 6, "company": "acme"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Validation failed: price: Product price cannot be negative, \
         rating: Rating must be between 0 and 5, company: acme is not supported"
    );
}

#[tokio::test]
async fn test_同名の商品は重複キーの400() {
    let (app, repository) = test_app();
    create(&app, json!({"name": "desk", "price": 199})).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(json!({"name": "desk", "price": 99})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Duplicate value entered for name field, please choose another value"
    );
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn test_壊れたjsonは400のjsonで返る() {
    let (app, _) = test_app();

    let response = send_raw(&app, Method::POST, "/api/v1/products", Some("{\"name\":")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.message().starts_with("Invalid request body: "),
        "{}",
        response.text
    );
}

#[tokio::test]
async fn test_未知のキーは400() {
    let (app, _) = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(json!({"name": "desk", "price": 1, "colour": "red"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.message().starts_with("Invalid request body: "));
}

#[tokio::test]
async fn test_content_typeなしのボディは400() {
    let (app, _) = test_app();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products")
        .body(axum::body::Body::from(r#"{"name":"desk","price":1}"#))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ===== 500 =====

#[tokio::test]
async fn test_ストア接続断は500で詳細を返さない() {
    let (app, repository) = test_app();
    repository.set_unavailable(true);

    let response = send(&app, Method::GET, "/api/v1/products", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"message": "Something went wrong, try again later"})
    );
}

/// 全メソッドでパニックするリポジトリ
struct PanickingRepository;

#[async_trait]
impl ProductRepository for PanickingRepository {
    async fn find_all(&self) -> Result<Vec<Product>, InfraError> {
        panic!("find_all exploded")
    }

    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, InfraError> {
        panic!("find_by_id exploded")
    }

    async fn insert(&self, _draft: ProductDraft) -> Result<Product, InfraError> {
        panic!("insert exploded")
    }

    async fn replace(
        &self,
        _id: &ProductId,
        _draft: ProductDraft,
    ) -> Result<Option<Product>, InfraError> {
        panic!("replace exploded")
    }

    async fn merge(
        &self,
        _id: &ProductId,
        _patch: ProductPatch,
    ) -> Result<Option<Product>, InfraError> {
        panic!("merge exploded")
    }

    async fn delete(&self, _id: &ProductId) -> Result<Option<Product>, InfraError> {
        panic!("delete exploded")
    }
}

#[tokio::test]
async fn test_ハンドラのパニックは500のjsonになる() {
    let app = build_app(Arc::new(PanickingRepository));

    let response = send(&app, Method::GET, "/api/v1/products", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.message(), "Something went wrong, try again later");
    assert!(response.request_id.is_some());
}

// ===== ストアに触れないルート =====

#[tokio::test]
async fn test_ルートはバナーを返す() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "Store api");
}

#[tokio::test]
async fn test_ヘルスチェックはストア断でも200() {
    let (app, repository) = test_app();
    repository.set_unavailable(true);

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}
