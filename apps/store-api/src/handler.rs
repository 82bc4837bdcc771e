//! # HTTP リクエストハンドラ
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs   # バナー、ヘルスチェック
//!     └── product.rs  # 商品 CRUD
//! ```
//!
//! ハンドラは「見つからない」だけを自前で `ProductNotFound` にし、
//! それ以外の失敗は `?` で [`StoreApiError`](crate::error::StoreApiError) に伝播させる。

pub mod health;
pub mod product;

pub use health::{health_check, index};
pub use product::{
    ProductState,
    create_product,
    delete_product,
    get_product,
    list_products,
    replace_product,
    update_product,
};
