use crate::application::projection::{OrderProjection, OrderProjectionReader, ProjectionStrategy};
use crate::application::ApplicationError;
use crate::domain::model::OrderId;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文プロジェクションを提供する
/// ライフサイクル操作（書き込みパス）からは独立した読み取りパス
pub struct OrderQueryService {
    projection_reader: Arc<dyn OrderProjectionReader>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `projection_reader` - プロジェクションリーダー
    pub fn new(projection_reader: Arc<dyn OrderProjectionReader>) -> Self {
        Self { projection_reader }
    }

    /// 注文IDでプロジェクションを取得
    ///
    /// # Returns
    /// * `Ok(Some(OrderProjection))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderProjection>, ApplicationError> {
        self.projection_reader
            .find_order_by_id(order_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された戦略で全注文のプロジェクションを取得
    /// どの戦略でも結果の形状と内容は同一で、クエリ形だけが異なる
    ///
    /// # Arguments
    /// * `strategy` - プロジェクション取得の戦略
    ///
    /// # Returns
    /// * `Ok(Vec<OrderProjection>)` - 注文プロジェクションのリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_orders(
        &self,
        strategy: ProjectionStrategy,
    ) -> Result<Vec<OrderProjection>, ApplicationError> {
        let result = match strategy {
            ProjectionStrategy::Join => self.projection_reader.find_orders_with_join().await,
            ProjectionStrategy::Batch => self.projection_reader.find_orders_with_batch().await,
            ProjectionStrategy::FlatJoin => {
                self.projection_reader.find_orders_with_flat_join().await
            }
        };
        result.map_err(ApplicationError::from)
    }
}
