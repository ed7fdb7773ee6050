use crate::domain::error::DomainError;
use crate::domain::model::{Delivery, Item, ItemId, MemberId, OrderId, OrderStatus};
use chrono::{DateTime, Utc};

/// 注文明細
/// 注文時点の価格と数量をスナップショットとして保持する（以後不変）
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    item_id: ItemId,
    order_price: i64,
    count: u32,
}

impl OrderItem {
    /// 新しい注文明細を作成し、商品の在庫を減らす
    /// 在庫が不足している場合は明細を作成せず OutOfStock を返す
    ///
    /// # Arguments
    /// * `item` - 注文対象の商品
    /// * `order_price` - 注文時点の単価
    /// * `count` - 数量（1以上）
    pub fn create(item: &mut Item, order_price: i64, count: u32) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::InvalidQuantity);
        }

        item.remove_stock(count)?;

        Ok(Self {
            item_id: item.id(),
            order_price,
            count,
        })
    }

    /// データベースから取得したデータで注文明細を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(item_id: ItemId, order_price: i64, count: u32) -> Self {
        Self {
            item_id,
            order_price,
            count,
        }
    }

    /// 商品IDを取得
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// 注文時点の単価を取得
    pub fn order_price(&self) -> i64 {
        self.order_price
    }

    /// 数量を取得
    pub fn count(&self) -> u32 {
        self.count
    }

    /// 明細の合計金額を計算（単価 × 数量）
    pub fn total_price(&self) -> i64 {
        self.order_price * self.count as i64
    }

    /// 明細をキャンセルし、商品の在庫を復元する
    /// 冪等ではないため、呼び出しは Order の状態遷移（1回限り）から行う
    fn cancel(&self, item: &mut Item) {
        item.add_stock(self.count);
    }
}

/// 注文集約
/// 配送と注文明細を値として所有し、注文のライフサイクルを管理する
/// 状態遷移は ORDER → CANCEL のみ
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    member_id: MemberId,
    delivery: Delivery,
    order_items: Vec<OrderItem>,
    order_date: DateTime<Utc>,
    status: OrderStatus,
}

impl Order {
    /// 新しい注文を作成する唯一の構築パス
    /// 注文日時は現在時刻、ステータスはORDERに設定される
    ///
    /// # Arguments
    /// * `id` - 注文ID
    /// * `member_id` - 注文者の会員ID（非所有の参照）
    /// * `delivery` - 配送（注文が所有する）
    /// * `order_items` - 注文明細（1つ以上、挿入順を保持）
    pub fn place(
        id: OrderId,
        member_id: MemberId,
        delivery: Delivery,
        order_items: Vec<OrderItem>,
    ) -> Result<Self, DomainError> {
        if order_items.is_empty() {
            return Err(DomainError::OrderValidation(
                "注文明細が空です。少なくとも1つの商品を追加してください".to_string(),
            ));
        }

        Ok(Self {
            id,
            member_id,
            delivery,
            order_items,
            order_date: Utc::now(),
            status: OrderStatus::Order,
        })
    }

    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: OrderId,
        member_id: MemberId,
        delivery: Delivery,
        order_items: Vec<OrderItem>,
        order_date: DateTime<Utc>,
        status: OrderStatus,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            member_id,
            delivery,
            order_items,
            order_date,
            status,
        })
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 会員IDを取得
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// 配送を取得
    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// 注文明細のリストを取得（挿入順）
    pub fn order_items(&self) -> &[OrderItem] {
        &self.order_items
    }

    /// 注文日時を取得
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// 注文ステータスを取得
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// 配送を完了にする
    pub fn complete_delivery(&mut self) {
        self.delivery.complete();
    }

    /// 注文をキャンセルし、全明細の在庫を復元する
    /// 事前条件:
    /// - 配送が完了していない（完了済みなら AlreadyDelivered）
    /// - ステータスがORDER（キャンセル済みなら InvalidOrderState）
    /// 状態遷移が1回限りであることにより、在庫の二重復元は起こらない
    ///
    /// # Arguments
    /// * `items` - 全明細が参照する商品（呼び出し側がロードして渡す）
    pub fn cancel(&mut self, items: &mut [Item]) -> Result<(), DomainError> {
        if self.delivery.is_completed() {
            return Err(DomainError::AlreadyDelivered);
        }
        if self.status == OrderStatus::Cancel {
            return Err(DomainError::InvalidOrderState(
                "既にキャンセル済みの注文です".to_string(),
            ));
        }

        // 先に全明細分の商品が揃っていることを確認してから状態を変更する
        for order_item in &self.order_items {
            if !items.iter().any(|item| item.id() == order_item.item_id()) {
                return Err(DomainError::OrderValidation(format!(
                    "注文明細の商品が見つかりません: {}",
                    order_item.item_id()
                )));
            }
        }

        self.status = OrderStatus::Cancel;

        for order_item in &self.order_items {
            // 上で存在確認済み
            if let Some(item) = items
                .iter_mut()
                .find(|item| item.id() == order_item.item_id())
            {
                order_item.cancel(item);
            }
        }

        Ok(())
    }

    /// 合計金額を計算
    /// 全明細の（単価 × 数量）の合計。毎回再計算し、キャッシュしない
    pub fn total_price(&self) -> i64 {
        self.order_items
            .iter()
            .map(|order_item| order_item.total_price())
            .sum()
    }
}
