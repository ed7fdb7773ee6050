use crate::domain::error::DomainError;
use crate::domain::model::{Address, MemberId, OrderId};

/// 会員エンティティ
/// 注文への参照は非所有のバックリファレンスのみを保持する
/// バックリファレンスの追加はオーケストレーション層が attach_order を
/// 明示的に呼び出して行う（エンティティ自身が裏で更新することはない）
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: MemberId,
    name: String,
    address: Address,
    orders: Vec<OrderId>,
}

impl Member {
    /// 新しい会員を作成
    pub fn new(id: MemberId, name: String, address: Address) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "会員名は空にできません".to_string(),
            ));
        }

        Ok(Self {
            id,
            name,
            address,
            orders: Vec::new(),
        })
    }

    /// データベースから取得したデータで会員を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(id: MemberId, name: String, address: Address, orders: Vec<OrderId>) -> Self {
        Self {
            id,
            name,
            address,
            orders,
        }
    }

    /// 会員IDを取得
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// 会員名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 住所を取得
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// 注文IDのバックリファレンスを取得
    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    /// 注文のバックリファレンスを追加
    /// 同じ注文IDは二重登録しない
    pub fn attach_order(&mut self, order_id: OrderId) {
        if !self.orders.contains(&order_id) {
            self.orders.push(order_id);
        }
    }

    /// 会員名を変更
    pub fn rename(&mut self, name: String) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "会員名は空にできません".to_string(),
            ));
        }
        self.name = name;
        Ok(())
    }
}
