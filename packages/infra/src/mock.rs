//! # テスト用インメモリ実装
//!
//! API テスト・起動シーケンステストで使用するインメモリのストアとコネクタ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! store-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! PostgreSQL 実装と同じスキーマ検証・商品名の一意制約を適用する。

use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use store_domain::product::{Product, ProductDraft, ProductFields, ProductId, ProductPatch};

use crate::{db::StoreConnector, error::InfraError, repository::ProductRepository};

// ===== InMemoryProductRepository =====

/// 挿入順を保持するインメモリ商品コレクション
///
/// `Clone` しても同じコレクションを共有する。
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products:    Arc<Mutex<Vec<Product>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の全操作を接続不能エラーにする（接続断のシミュレーション）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 保存件数
    pub fn len(&self) -> usize {
        self.products.lock().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collection(&self) -> Result<MutexGuard<'_, Vec<Product>>, InfraError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(InfraError::unavailable("in-memory store is unavailable"));
        }
        self.products
            .lock()
            .map_err(|_| InfraError::unavailable("in-memory store lock is poisoned"))
    }
}

/// 商品名の一意制約
fn ensure_unique_name(
    products: &[Product],
    fields: &ProductFields,
    except: Option<&ProductId>,
) -> Result<(), InfraError> {
    let conflict = products
        .iter()
        .any(|p| Some(p.id()) != except && p.name() == fields.name);
    if conflict {
        return Err(InfraError::duplicate_key("name"));
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, InfraError> {
        Ok(self.collection()?.clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        Ok(self.collection()?.iter().find(|p| p.id() == id).cloned())
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, InfraError> {
        let mut products = self.collection()?;
        let fields = draft.validate()?;
        ensure_unique_name(&products, &fields, None)?;

        let product = Product::new(ProductId::new(), fields);
        products.push(product.clone());
        Ok(product)
    }

    async fn replace(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Option<Product>, InfraError> {
        let mut products = self.collection()?;
        // PostgreSQL 実装と同じく、存在確認より先にスキーマ検証する
        let fields = draft.validate()?;
        let Some(index) = products.iter().position(|p| p.id() == id) else {
            return Ok(None);
        };
        ensure_unique_name(&products, &fields, Some(id))?;

        let product = Product::new(*id, fields);
        products[index] = product.clone();
        Ok(Some(product))
    }

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

    async fn delete(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        let mut products = self.collection()?;
        let Some(index) = products.iter().position(|p| p.id() == id) else {
            return Ok(None);
        };
        Ok(Some(products.remove(index)))
    }
}

// ===== コネクタ =====

/// 常に同じインメモリコレクションを返すコネクタ
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    repository: InMemoryProductRepository,
}

impl InMemoryConnector {
    pub fn new(repository: InMemoryProductRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl StoreConnector for InMemoryConnector {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn ProductRepository>, InfraError> {
        Ok(Arc::new(self.repository.clone()))
    }
}

/// 常に接続に失敗するコネクタ（DB 到達不能のシミュレーション）
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableConnector;

#[async_trait]
impl StoreConnector for UnreachableConnector {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn ProductRepository>, InfraError> {
        Err(InfraError::unavailable(format!("cannot reach {uri}")))
    }
}
