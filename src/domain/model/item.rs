use crate::domain::error::DomainError;
use crate::domain::model::ItemId;

/// 商品の種別ごとの属性
/// 現状は書籍のみを扱う
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// 書籍
    Book { author: String, isbn: String },
}

/// 商品集約
/// 在庫数の増減ロジックを所有する
/// 在庫を変更できるのは remove_stock / add_stock の2つのみ
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    name: String,
    price: i64,
    stock_quantity: u32,
    kind: ItemKind,
}

impl Item {
    /// 新しい書籍商品を作成
    pub fn book(
        id: ItemId,
        name: String,
        price: i64,
        stock_quantity: u32,
        author: String,
        isbn: String,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "商品名は空にできません".to_string(),
            ));
        }
        if price < 0 {
            return Err(DomainError::InvalidValue(format!(
                "商品価格は0以上である必要があります: {}",
                price
            )));
        }

        Ok(Self {
            id,
            name,
            price,
            stock_quantity,
            kind: ItemKind::Book { author, isbn },
        })
    }

    /// データベースから取得したデータで商品を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: ItemId,
        name: String,
        price: i64,
        stock_quantity: u32,
        kind: ItemKind,
    ) -> Self {
        Self {
            id,
            name,
            price,
            stock_quantity,
            kind,
        }
    }

    /// 商品IDを取得
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 価格を取得
    pub fn price(&self) -> i64 {
        self.price
    }

    /// 在庫数を取得
    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// 商品種別を取得
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// 在庫を減らす
    ///
    /// # Arguments
    /// * `quantity` - 減らす数量
    ///
    /// # Returns
    /// * `Ok(())` - 減少成功
    /// * `Err(DomainError::OutOfStock)` - 在庫不足（在庫数は変更されない）
    pub fn remove_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity > self.stock_quantity {
            return Err(DomainError::OutOfStock {
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        self.stock_quantity -= quantity;
        Ok(())
    }

    /// 在庫を増やす（キャンセル時の在庫復元など）
    ///
    /// # Arguments
    /// * `quantity` - 増やす数量
    pub fn add_stock(&mut self, quantity: u32) {
        self.stock_quantity += quantity;
    }
}
