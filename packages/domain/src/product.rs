//! # 商品（Product）
//!
//! ストアに保存される商品ドキュメントのドメインモデル。
//!
//! ## モデルの構成
//!
//! | 型 | 用途 |
//! |----|------|
//! | [`Product`] | 保存済みドキュメント（`_id` 付き） |
//! | [`ProductFields`] | スキーマルールを満たしたフィールド群 |
//! | [`ProductDraft`] | 作成・置換（PUT）の入力。未検証 |
//! | [`ProductPatch`] | 部分更新（PATCH）の入力。未検証 |
//!
//! 入力モデルは必須フィールドも `Option` で受け取る。欠落を JSON パースエラーではなく
//! スキーマ違反として扱い、違反フィールドをまとめて列挙するため。
//!
//! ## 数値の表現
//!
//! `price` / `rating` は [`serde_json::Number`] で保持する。`199` は `199` のまま、
//! `19.99` は `19.99` のまま往復する。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{DomainError, FieldError};

/// 商品名の最大文字数
pub const MAX_NAME_LENGTH: usize = 100;

/// 評価の上限
pub const MAX_RATING: f64 = 5.0;

/// 商品の一意識別子
///
/// ストアが作成時に採番する（UUID v7）。JSON では `_id` キーの文字列として表現される。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい ID を生成する（UUID v7）
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// 既存の UUID から ID を作成する
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// パスパラメータ等の文字列から ID を解釈する
    ///
    /// UUID として解釈できない場合は [`DomainError::InvalidId`] を返す。
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| DomainError::InvalidId(raw.to_string()))
    }

    /// 内部の UUID 参照を取得する
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 取り扱いメーカー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Company {
    Ikea,
    Liddy,
    Caressa,
    Marcos,
}

/// スキーマルールを満たした商品フィールド
///
/// ストアに保存されるドキュメント本体。オプションフィールドは未設定なら出力しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name:     String,
    pub price:    Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating:   Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company:  Option<Company>,
}

/// 保存済みの商品ドキュメント
///
/// ```rust
/// use store_domain::product::{Product, ProductDraft, ProductId};
///
/// let draft: ProductDraft = serde_json::from_str(r#"{"name":"desk","price":199}"#).unwrap();
/// let product = Product::new(ProductId::new(), draft.validate().unwrap());
///
/// let json = serde_json::to_value(&product).unwrap();
/// assert_eq!(json["name"], "desk");
/// assert_eq!(json["price"], 199);
/// assert_eq!(json["_id"], product.id().to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    fields: ProductFields,
    #[serde(rename = "_id")]
    id:     ProductId,
}

impl Product {
    pub fn new(id: ProductId, fields: ProductFields) -> Self {
        Self { fields, id }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub fn into_fields(self) -> ProductFields {
        self.fields
    }
}

/// 作成・置換リクエストの入力
///
/// 未知のキーはデシリアライズ時点で拒否する。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductDraft {
    pub name:     Option<String>,
    pub price:    Option<Number>,
    pub featured: Option<bool>,
    pub rating:   Option<Number>,
    pub company:  Option<String>,
}

impl ProductDraft {
    /// スキーマルールを適用し、保存可能なフィールド群に変換する
    ///
    /// 違反はフィールド順にすべて収集し、1 件以上あれば
    /// [`DomainError::Validation`] として返す。
    pub fn validate(self) -> Result<ProductFields, DomainError> {
        let mut errors = Vec::new();

        let name = match self.name.map(|n| n.trim().to_string()) {
            None => {
                errors.push(FieldError::new("name", "Please provide product name"));
                None
            }
            Some(n) if n.is_empty() => {
                errors.push(FieldError::new("name", "Please provide product name"));
                None
            }
            Some(n) if n.chars().count() > MAX_NAME_LENGTH => {
                errors.push(FieldError::new(
                    "name",
                    format!("Product name cannot be more than {MAX_NAME_LENGTH} characters"),
                ));
                None
            }
            Some(n) => Some(n),
        };

        let price = match self.price {
            None => {
                errors.push(FieldError::new("price", "Please provide product price"));
                None
            }
            Some(p) if !p.as_f64().is_some_and(|v| v >= 0.0) => {
                errors.push(FieldError::new("price", "Product price cannot be negative"));
                None
            }
            Some(p) => Some(p),
        };

        let rating_out_of_range = self
            .rating
            .as_ref()
            .is_some_and(|r| !r.as_f64().is_some_and(|v| (0.0..=MAX_RATING).contains(&v)));
        if rating_out_of_range {
            errors.push(FieldError::new(
                "rating",
                format!("Rating must be between 0 and {MAX_RATING}"),
            ));
        }

        let company = match self.company {
            None => None,
            Some(raw) => match raw.parse::<Company>() {
                Ok(company) => Some(company),
                Err(_) => {
                    errors.push(FieldError::new("company", format!("{raw} is not supported")));
                    None
                }
            },
        };

        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => Ok(ProductFields {
                name,
                price,
                featured: self.featured,
                rating: self.rating,
                company,
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

impl From<ProductFields> for ProductDraft {
    fn from(fields: ProductFields) -> Self {
        Self {
            name:     Some(fields.name),
            price:    Some(fields.price),
            featured: fields.featured,
            rating:   fields.rating,
            company:  fields.company.map(|c| c.to_string()),
        }
    }
}

/// 部分更新リクエストの入力
///
/// 各フィールドは三状態を持つ:
///
/// - キーなし（`None`）: 現在の値を維持
/// - `null`（`Some(None)`）: 値を消去
/// - 値あり（`Some(Some(v))`）: 置き換え
///
/// 必須フィールドを `null` にした場合はマージ後の検証で拒否される。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, deserialize_with = "present")]
    pub name:     Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price:    Option<Option<Number>>,
    #[serde(default, deserialize_with = "present")]
    pub featured: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub rating:   Option<Option<Number>>,
    #[serde(default, deserialize_with = "present")]
    pub company:  Option<Option<String>>,
}

impl ProductPatch {
    /// 現在のドキュメントにパッチを重ね、検証前の入力を組み立てる
    pub fn merge_into(self, current: ProductFields) -> ProductDraft {
        let base = ProductDraft::from(current);
        ProductDraft {
            name:     self.name.unwrap_or(base.name),
            price:    self.price.unwrap_or(base.price),
            featured: self.featured.unwrap_or(base.featured),
            rating:   self.rating.unwrap_or(base.rating),
            company:  self.company.unwrap_or(base.company),
        }
    }
}

/// キーが存在すれば `null` でも `Some` にする
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
