//! # ProductRepository
//!
//! 商品ドキュメントの永続化を担当するリポジトリ。
//!
//! ## 保存形式
//!
//! `products` テーブルの `doc` カラム（JSONB）に [`ProductFields`] をそのまま保存する。
//! 識別子は `id` カラム、挿入順は `created_at` で保持する。
//!
//! ## 並行性
//!
//! トランザクション・ロック・リトライは使わない。各操作は単一文で完結し、
//! 原子性はストアに委ねる。部分更新のみ「読み取り → 検証 → 書き込み」の 2 文になる。

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use store_domain::product::{Product, ProductDraft, ProductFields, ProductId, ProductPatch};
use uuid::Uuid;

use crate::error::InfraError;

/// 商品リポジトリトレイト
///
/// 書き込み系メソッドは未検証の入力を受け取り、スキーマルールを適用してから保存する。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 全商品を挿入順で取得する
    async fn find_all(&self) -> Result<Vec<Product>, InfraError>;

    /// ID で商品を検索する
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError>;

    /// 商品を作成する。識別子はここで採番する
    async fn insert(&self, draft: ProductDraft) -> Result<Product, InfraError>;

    /// ドキュメント全体を置き換える
    async fn replace(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Option<Product>, InfraError>;

    /// 指定フィールドのみを更新する
    async fn merge(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, InfraError>;

    /// 商品を削除し、削除したドキュメントを返す
    async fn delete(&self, id: &ProductId) -> Result<Option<Product>, InfraError>;
}

/// `id, doc` 行
type ProductRow = (Uuid, Json<ProductFields>);

fn into_product((id, Json(fields)): ProductRow) -> Product {
    Product::new(ProductId::from_uuid(id), fields)
}

/// PostgreSQL 実装の ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Product>, InfraError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, doc
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_product).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, doc
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_product))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, draft: ProductDraft) -> Result<Product, InfraError> {
        let fields = draft.validate()?;
        let id = ProductId::new();

        sqlx::query(
            r#"
            INSERT INTO products (id, doc)
            VALUES ($1, $2)
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&fields))
        .execute(&self.pool)
        .await?;

        Ok(Product::new(id, fields))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn replace(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Option<Product>, InfraError> {
        let fields = draft.validate()?;

        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            UPDATE products
            SET doc = $2
            WHERE id = $1
            RETURNING id, doc
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&fields))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_product))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn merge(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, InfraError> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        self.replace(id, patch.merge_into(current.into_fields()))
            .await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, doc
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_product))
    }
}
