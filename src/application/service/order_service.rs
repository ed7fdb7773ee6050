use crate::application::ApplicationError;
use crate::domain::model::{Delivery, Item, ItemId, MemberId, Order, OrderId, OrderItem};
use crate::domain::port::{ItemRepository, Logger, MemberRepository, OrderRepository};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 注文アプリケーションサービス
/// 注文のライフサイクル（発注・キャンセル）をオーケストレーションする
pub struct OrderApplicationService<OR, MR, IR>
where
    OR: OrderRepository,
    MR: MemberRepository,
    IR: ItemRepository,
{
    order_repository: OR,
    member_repository: MR,
    item_repository: IR,
    logger: Arc<dyn Logger>,
}

impl<OR, MR, IR> OrderApplicationService<OR, MR, IR>
where
    OR: OrderRepository,
    MR: MemberRepository,
    IR: ItemRepository,
{
    /// 新しい注文アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    /// * `member_repository` - 会員リポジトリ
    /// * `item_repository` - 商品リポジトリ
    /// * `logger` - ロガー
    pub fn new(
        order_repository: OR,
        member_repository: MR,
        item_repository: IR,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            order_repository,
            member_repository,
            item_repository,
            logger,
        }
    }

    /// 注文を発注する
    /// 会員と商品をロードし、会員の住所を配送先として注文集約を構築・永続化する
    /// 在庫不足の場合は何も永続化されない（在庫減少・注文作成のどちらも残らない）
    ///
    /// # Arguments
    /// * `member_id` - 注文者の会員ID
    /// * `item_id` - 注文する商品ID
    /// * `count` - 数量
    ///
    /// # Returns
    /// * `Ok(OrderId)` - 作成された注文のID
    /// * `Err(ApplicationError)` - 発注失敗
    pub async fn place_order(
        &self,
        member_id: MemberId,
        item_id: ItemId,
        count: u32,
    ) -> Result<OrderId, ApplicationError> {
        let correlation_id = Uuid::new_v4();

        let mut member = self
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("会員が見つかりません: {}", member_id))
            })?;

        let mut item = self
            .item_repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("商品が見つかりません: {}", item_id))
            })?;

        // 在庫減少はここでインメモリの商品に対して行われる
        // 失敗した場合は永続化前なので部分的な状態は残らない
        let order_price = item.price();
        let order_item = OrderItem::create(&mut item, order_price, count).map_err(|err| {
            self.logger.warn(
                "OrderApplicationService",
                &format!("発注を拒否しました: {}", err),
                Some(correlation_id),
                Some(HashMap::from([
                    ("member_id".to_string(), member_id.to_string()),
                    ("item_id".to_string(), item_id.to_string()),
                    ("count".to_string(), count.to_string()),
                ])),
            );
            ApplicationError::from(err)
        })?;

        let order_id = self.order_repository.next_identity();
        let delivery = Delivery::ready(member.address().clone());
        let order = Order::place(order_id, member.id(), delivery, vec![order_item])?;

        // バックリファレンスの追加はオーケストレーション層が明示的に行う
        member.attach_order(order.id());

        // 注文と在庫の変化は1つのユニットオブワークでコミットされる
        self.order_repository
            .save(&order, std::slice::from_ref(&item))
            .await?;
        self.member_repository.save(&member).await?;

        self.logger.info(
            "OrderApplicationService",
            "注文を受け付けました",
            Some(correlation_id),
            Some(HashMap::from([
                ("order_id".to_string(), order.id().to_string()),
                ("member_id".to_string(), member_id.to_string()),
                ("total_price".to_string(), order.total_price().to_string()),
            ])),
        );

        Ok(order.id())
    }

    /// 注文をキャンセルする
    /// 明細が参照する商品をロードし、状態遷移と在庫復元を1つのユニットオブワークで永続化する
    ///
    /// # Arguments
    /// * `order_id` - キャンセルする注文ID
    ///
    /// # Returns
    /// * `Ok(())` - キャンセル成功
    /// * `Err(ApplicationError)` - キャンセル失敗
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<(), ApplicationError> {
        let correlation_id = Uuid::new_v4();

        let mut order = self
            .order_repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("注文が見つかりません: {}", order_id))
            })?;

        let item_ids: Vec<ItemId> = order
            .order_items()
            .iter()
            .map(|line| line.item_id())
            .collect();

        let mut items: Vec<Item> = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            // 同じ商品が複数明細から参照されていても1回だけロードする
            if items.iter().any(|item| item.id() == item_id) {
                continue;
            }
            let item = self
                .item_repository
                .find_by_id(item_id)
                .await?
                .ok_or_else(|| {
                    ApplicationError::NotFound(format!("商品が見つかりません: {}", item_id))
                })?;
            items.push(item);
        }

        order.cancel(&mut items).map_err(|err| {
            self.logger.warn(
                "OrderApplicationService",
                &format!("キャンセルを拒否しました: {}", err),
                Some(correlation_id),
                Some(HashMap::from([(
                    "order_id".to_string(),
                    order_id.to_string(),
                )])),
            );
            ApplicationError::from(err)
        })?;

        self.order_repository.save(&order, &items).await?;

        self.logger.info(
            "OrderApplicationService",
            "注文をキャンセルしました",
            Some(correlation_id),
            Some(HashMap::from([(
                "order_id".to_string(),
                order_id.to_string(),
            )])),
        );

        Ok(())
    }

    /// 注文IDで注文集約を取得
    ///
    /// # Arguments
    /// * `order_id` - 注文ID
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Order>, ApplicationError> {
        self.order_repository
            .find_by_id(order_id)
            .await
            .map_err(ApplicationError::from)
    }
}
