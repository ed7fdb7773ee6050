// 読み取り専用のプロジェクション（投影）
// 集約グラフを平坦なDTOに完全マテリアライズして返す読み取りパス
// 遅延ロード中の生きたオブジェクトを外部に渡すことはない

use crate::domain::model::OrderId;
use crate::domain::port::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 住所のプロジェクション
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressProjection {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

/// 注文明細のプロジェクション
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemProjection {
    pub item_name: String,
    pub order_price: i64,
    pub count: u32,
}

/// 注文のプロジェクション
/// 会員名・配送先住所・注文明細を1つの平坦な構造に集約する
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderProjection {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub address: AddressProjection,
    pub order_items: Vec<OrderItemProjection>,
}

/// プロジェクション取得の戦略
/// 同じ結果形状を、異なるクエリ形で取得する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionStrategy {
    /// ルートをジョインで1回取得し、注文ごとに明細クエリを発行する
    Join,
    /// ルートを1回、全明細をIN句で1回取得してアプリケーション側で結合する
    Batch,
    /// グラフ全体を1回のジョインで平坦に取得し、アプリケーション側で再グループ化する
    FlatJoin,
}

/// プロジェクション戦略のエラー
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Unknown projection strategy: {0}")]
    UnknownStrategy(String),
}

impl ProjectionStrategy {
    /// 文字列からProjectionStrategyを作成
    pub fn from_string(s: &str) -> Result<Self, ProjectionError> {
        match s {
            "join" => Ok(ProjectionStrategy::Join),
            "batch" => Ok(ProjectionStrategy::Batch),
            "flat" => Ok(ProjectionStrategy::FlatJoin),
            _ => Err(ProjectionError::UnknownStrategy(s.to_string())),
        }
    }
}

/// 注文プロジェクションリーダートレイト
/// 読み取り専用クエリの実行を抽象化するポート
/// すべてのメソッドは完全にマテリアライズされたDTOを返す
#[async_trait]
pub trait OrderProjectionReader: Send + Sync {
    /// 注文IDで単一のプロジェクションを取得する
    async fn find_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderProjection>, RepositoryError>;

    /// ジョイン戦略で全注文のプロジェクションを取得する
    /// ルート1回 + 注文ごとに明細クエリ1回
    async fn find_orders_with_join(&self) -> Result<Vec<OrderProjection>, RepositoryError>;

    /// バッチ戦略で全注文のプロジェクションを取得する
    /// ルート1回 + IN句の明細クエリ1回
    async fn find_orders_with_batch(&self) -> Result<Vec<OrderProjection>, RepositoryError>;

    /// フラットジョイン戦略で全注文のプロジェクションを取得する
    /// 非正規化された1回のジョイン結果をアプリケーション側で再グループ化する
    async fn find_orders_with_flat_join(&self) -> Result<Vec<OrderProjection>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_strategy_from_string_valid() {
        assert_eq!(
            ProjectionStrategy::from_string("join").unwrap(),
            ProjectionStrategy::Join
        );
        assert_eq!(
            ProjectionStrategy::from_string("batch").unwrap(),
            ProjectionStrategy::Batch
        );
        assert_eq!(
            ProjectionStrategy::from_string("flat").unwrap(),
            ProjectionStrategy::FlatJoin
        );
    }

    #[test]
    fn test_projection_strategy_from_string_invalid() {
        assert!(ProjectionStrategy::from_string("lazy").is_err());
        assert!(ProjectionStrategy::from_string("").is_err());
    }

    #[test]
    fn test_order_projection_serializes_to_flat_json() {
        let projection = OrderProjection {
            order_id: Uuid::new_v4(),
            member_name: "userA".to_string(),
            order_date: Utc::now(),
            status: "ORDER".to_string(),
            address: AddressProjection {
                city: "seoul".to_string(),
                street: "뱅뱅사거리 35-10".to_string(),
                zipcode: "123-123".to_string(),
            },
            order_items: vec![OrderItemProjection {
                item_name: "OLD JPA".to_string(),
                order_price: 35000,
                count: 3,
            }],
        };

        let json = serde_json::to_string(&projection).unwrap();
        assert!(json.contains("\"member_name\":\"userA\""));
        assert!(json.contains("\"order_price\":35000"));
    }
}
